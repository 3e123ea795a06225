//! Round-trip and query behavior over whole advertisements.

use press_git::{
    decode_refs, encode_data_line, encode_flush, find_branch, find_head, RefRecord,
};

const HEAD_SHA: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1";
const MAIN_SHA: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb2";

fn github_style_advertisement() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend(encode_data_line("# service=git-upload-pack\n"));
    buf.extend(encode_flush());
    buf.extend(encode_data_line(&format!(
        "{HEAD_SHA} HEAD\0multi_ack thin-pack side-band-64k symref=HEAD:refs/heads/main \
         object-format:sha1 agent:git/github-g1234abcd\n"
    )));
    buf.extend(encode_data_line(&format!("{MAIN_SHA} refs/heads/main\n")));
    buf.extend(encode_flush());
    buf
}

#[test]
fn head_and_branch_resolve_from_decoded_advertisement() {
    let buf = github_style_advertisement();
    let records: Vec<RefRecord> = decode_refs(&buf).collect::<Result<_, _>>().unwrap();
    assert_eq!(records.len(), 2);

    let head = find_head(&records).expect("HEAD is advertised first");
    assert_eq!(head.sha, HEAD_SHA);
    assert_eq!(head.head_ref, "refs/heads/main");
    assert_eq!(head.branch, "main");

    let main = find_branch(&records, "main").expect("main is advertised");
    assert_eq!(main.sha, MAIN_SHA);
}

#[test]
fn encode_then_decode_reproduces_records() {
    let expected = vec![
        RefRecord {
            ref_name: "HEAD".to_owned(),
            oid: HEAD_SHA.to_owned(),
            head_ref: Some("refs/heads/main".to_owned()),
            object_format: Some("sha1".to_owned()),
            ..RefRecord::default()
        },
        RefRecord {
            ref_name: "refs/heads/main".to_owned(),
            oid: MAIN_SHA.to_owned(),
            ..RefRecord::default()
        },
        RefRecord {
            ref_name: "refs/tags/v1^{}".to_owned(),
            oid: "ccccccccccccccccccccccccccccccccccccccc3".to_owned(),
            peeled: Some("ddddddddddddddddddddddddddddddddddddddd4".to_owned()),
            ..RefRecord::default()
        },
    ];

    let mut buf = Vec::new();
    buf.extend(encode_data_line(&format!(
        "{} HEAD\0symref=HEAD:refs/heads/main object-format:sha1\n",
        expected[0].oid
    )));
    buf.extend(encode_data_line(&format!("{} refs/heads/main\n", expected[1].oid)));
    buf.extend(encode_data_line(&format!(
        "{} refs/tags/v1^{{}} peeled:{}\n",
        expected[2].oid,
        expected[2].peeled.as_deref().unwrap(),
    )));
    buf.extend(encode_flush());

    let decoded: Vec<RefRecord> = decode_refs(&buf).collect::<Result<_, _>>().unwrap();
    assert_eq!(decoded, expected);
}

#[test]
fn ref_records_serialize_with_protocol_field_names() {
    let buf = github_style_advertisement();
    let records: Vec<RefRecord> = decode_refs(&buf).collect::<Result<_, _>>().unwrap();

    let json = serde_json::to_value(&records[0]).unwrap();
    assert_eq!(json["ref"], "HEAD");
    assert_eq!(json["oid"], HEAD_SHA);
    assert_eq!(json["HEADRef"], "refs/heads/main");
    assert_eq!(json["objectFormat"], "sha1");
    // Absent optionals are omitted entirely.
    assert!(json.get("peeled").is_none());
}
