use bplist_writer::{Opaque, Plist, Value};

use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// A symbolic name, stored as a marshalled blob.
#[derive(Debug)]
struct Symbol(&'static str);

impl Opaque for Symbol {
    fn serialize_opaque(&self) -> bplist_writer::Result<Vec<u8>> {
        let mut dump = vec![0x04, 0x08, b':', self.0.len() as u8 + 5];
        dump.extend_from_slice(self.0.as_bytes());
        Ok(dump)
    }
}

#[test]
fn test_serialize_mixed_array() {
    let mut plist_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    plist_path.push("tests/mixed.plist");

    let mut file = fs::File::open(plist_path).unwrap();
    let mut data = Vec::new();
    file.read_to_end(&mut data).unwrap();

    let mut plist = Plist::new();
    let a = plist.insert(Value::Opaque(Box::new(Symbol("a"))));
    let b = plist.insert(Value::Opaque(Box::new(Symbol("b"))));
    let stuff = plist.insert("stuff");
    let whatever = plist.insert("whatever");
    let dictionary = plist.insert(Value::Dictionary(vec![(stuff, whatever)]));
    let number = plist.insert(123i64);
    let root = plist.insert(Value::Array(vec![a, b, dictionary, number]));

    assert_eq!(plist.encode(root), Ok(data));
}
