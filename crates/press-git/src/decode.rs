//! Lazy pkt-line decoding of a ref advertisement buffer.

use crate::error::RefDecodeError;
use crate::refs::RefRecord;
use crate::Result;

/// Decodes the body of an `info/refs?service=git-upload-pack` response.
///
/// The returned iterator is lazy and holds no state beyond its position in
/// `buf`; re-invoking on the same buffer restarts from byte 0.
pub fn decode_refs(buf: &[u8]) -> RefDecoder<'_> {
    RefDecoder {
        buf,
        pos: 0,
        done: false,
    }
}

/// Iterator over the ref records of one advertisement buffer.
///
/// Flush/delimiter packets and the `# service=…` announcement line are
/// skipped; a zero-length payload ends the sequence; malformed or truncated
/// framing yields an error and stops.
#[derive(Debug)]
pub struct RefDecoder<'a> {
    buf: &'a [u8],
    pos: usize,
    done: bool,
}

impl RefDecoder<'_> {
    fn fail(&mut self, error: RefDecodeError) -> Option<Result<RefRecord>> {
        self.done = true;
        Some(Err(error))
    }
}

impl Iterator for RefDecoder<'_> {
    type Item = Result<RefRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if self.pos >= self.buf.len() {
                self.done = true;
                return None;
            }

            let remaining = self.buf.len() - self.pos;
            if remaining < 4 {
                return self.fail(RefDecodeError::TruncatedInput {
                    offset: self.pos,
                    declared: 4,
                    available: remaining,
                });
            }

            let prefix = &self.buf[self.pos..self.pos + 4];
            let length = match std::str::from_utf8(prefix)
                .ok()
                .and_then(|hex| usize::from_str_radix(hex, 16).ok())
            {
                Some(length) => length,
                None => {
                    return self.fail(RefDecodeError::MalformedLength {
                        prefix: String::from_utf8_lossy(prefix).into_owned(),
                        offset: self.pos,
                    });
                }
            };
            self.pos += 4;

            // 0000 flush and 0001 delimiter frame sections; skip them.
            if length <= 1 {
                continue;
            }

            // A declared length that leaves no payload (0002..=0004) is the
            // end of transmission.
            let payload_len = length.saturating_sub(4);
            if payload_len == 0 {
                self.done = true;
                return None;
            }

            let available = self.buf.len() - self.pos;
            if available < payload_len {
                return self.fail(RefDecodeError::TruncatedInput {
                    offset: self.pos,
                    declared: payload_len,
                    available,
                });
            }

            let offset = self.pos;
            let payload = &self.buf[self.pos..self.pos + payload_len];
            self.pos += payload_len;

            let line = match std::str::from_utf8(payload) {
                Ok(line) => line.trim_end(),
                Err(_) => return self.fail(RefDecodeError::InvalidUtf8 { offset }),
            };

            match parse_line(line, offset) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(error) => return self.fail(error),
            }
        }
    }
}

/// Parses one advertisement line. `None` means a comment/service line.
fn parse_line(line: &str, offset: usize) -> Result<Option<RefRecord>> {
    let (oid, remainder) = line
        .split_once(' ')
        .ok_or(RefDecodeError::MissingRef { offset })?;

    // "# service=git-upload-pack" announcement.
    if oid == "#" {
        return Ok(None);
    }

    // v0 advertisements glue capabilities to the first ref with a NUL;
    // v2 lists space-separated attributes directly after the ref name.
    let (ref_section, nul_capabilities) = match remainder.split_once('\0') {
        Some((before, after)) => (before, Some(after)),
        None => (remainder, None),
    };

    let mut fields = ref_section.split(' ');
    let ref_name = fields.next().unwrap_or_default();

    let mut record = RefRecord {
        ref_name: ref_name.to_owned(),
        oid: oid.to_owned(),
        ..RefRecord::default()
    };

    for attribute in fields {
        apply_capability(&mut record, attribute);
    }
    if let Some(capabilities) = nul_capabilities {
        for capability in capabilities.split(' ') {
            apply_capability(&mut record, capability);
        }
    }

    Ok(Some(record))
}

fn apply_capability(record: &mut RefRecord, capability: &str) {
    let Some((key, value)) = capability.split_once(':') else {
        return;
    };
    match key {
        "symref-target" => record.symref_target = Some(value.to_owned()),
        "peeled" => record.peeled = Some(value.to_owned()),
        "symref=HEAD" => record.head_ref = Some(value.to_owned()),
        "object-format" => record.object_format = Some(value.to_owned()),
        "agent" => record.agent = Some(value.to_owned()),
        _ => {}
    }
}
