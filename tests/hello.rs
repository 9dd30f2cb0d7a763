use std::fs;
use std::io::Read;
use std::path::PathBuf;

fn fixture(name: &str) -> Vec<u8> {
    let mut plist_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    plist_path.push("tests");
    plist_path.push(name);

    let mut file = fs::File::open(plist_path).unwrap();
    let mut data = Vec::new();
    file.read_to_end(&mut data).unwrap();
    data
}

#[test]
fn test_serialize_string_root() {
    let mut plist = bplist_writer::Plist::new();
    let root = plist.insert("hello");

    assert_eq!(
        bplist_writer::encode(&plist, root),
        Ok(fixture("hello.plist"))
    );
}

#[test]
fn test_serialize_string_root_with_serde() {
    assert_eq!(
        bplist_writer::to_vec("hello"),
        Ok(fixture("hello.plist"))
    );
}
