//! The reference snapshot: one of every record shape, with known contents.
//!
//! The key set and values follow a snapshot written by a real server, so
//! every encoding appears at least once: raw, integer and compressed
//! strings, general and ziplist lists, general and intset sets, general and
//! ziplist sorted sets, general and zipmap hashes.

use rdb_types::{Entity, HashField, ScoredMember, Value};

use crate::builder::{FixtureError, SnapshotBuilder};
use crate::encoding::ZipEntry;

/// A snapshot under construction together with the entities it must
/// decode to.
struct Fixture {
    builder: SnapshotBuilder,
    expected: Vec<Entity>,
}

impl Fixture {
    fn expect(&mut self, key: &str, value: Value) {
        self.expected.push(Entity::new(key, value));
    }
}

fn items(values: &[&str]) -> Vec<Vec<u8>> {
    values.iter().map(|v| v.as_bytes().to_vec()).collect()
}

fn ints(values: &[i64]) -> Vec<ZipEntry> {
    values.iter().copied().map(ZipEntry::Int).collect()
}

fn decoded(entries: &[ZipEntry]) -> Vec<Vec<u8>> {
    entries.iter().map(ZipEntry::decoded).collect()
}

fn pairs_to_zset(flat: &[Vec<u8>]) -> Value {
    Value::SortedSet(
        flat.chunks(2)
            .map(|p| ScoredMember::new(p[0].clone(), String::from_utf8_lossy(&p[1]).into_owned()))
            .collect(),
    )
}

fn hash(fields: &[(&str, &str)]) -> Value {
    Value::Hash(fields.iter().map(|(f, v)| HashField::new(*f, *v)).collect())
}

/// The long value stored LZF-compressed under `s1`.
#[must_use]
pub fn compressible_text() -> String {
    format!(
        ".ahaa bit longer and with spaceslonger than 256 characters and trivially compressible {}",
        "-".repeat(460)
    )
}

/// Build the reference snapshot and the entities it decodes to, in order.
///
/// # Errors
///
/// Propagates [`FixtureError`] from the builder; the reference contents
/// always compress, so this does not happen in practice.
#[allow(clippy::too_many_lines)]
pub fn reference() -> Result<(Vec<u8>, Vec<Entity>), FixtureError> {
    let mut f = Fixture {
        builder: SnapshotBuilder::new(),
        expected: Vec::new(),
    };
    f.builder.select_db(0);

    f.builder.string("k1", "ssssssss");
    f.expect("k1", Value::String(b"ssssssss".to_vec()));
    f.builder.string("k3", "wwwwwwww");
    f.expect("k3", Value::String(b"wwwwwwww".to_vec()));

    let long = compressible_text();
    f.builder.lzf_string("s1", &long);
    f.expect("s1", Value::String(long.into_bytes()));
    f.builder.string("s2", "now_exists");
    f.expect("s2", Value::String(b"now_exists".to_vec()));
    f.builder.int_string("n5b", 1000);
    f.expect("n5b", Value::String(b"1000".to_vec()));

    for (key, values) in [
        ("l10", &[100_001, 100_002, 100_003, 100_004][..]),
        ("l11", &[9_999_999_999, 9_999_999_998, 9_999_999_997][..]),
        ("l12", &[9_999_999_997, 9_999_999_998, 9_999_999_999][..]),
    ] {
        let entries = ints(values);
        f.builder.ziplist_list(key, &entries);
        f.expect(key, Value::List(decoded(&entries)));
    }

    for n in 1..=5usize {
        let mut bytes = vec![0u8; n - 1];
        bytes.push(0xFF);
        let key = format!("b{n}");
        f.builder.string(&key, &bytes);
        f.expect(&key, Value::String(bytes));
    }

    let boring = format!(
        "now this is quite a bit longer, but sort of boring{}",
        ".".repeat(300)
    );
    let h1 = [
        ("c", boring.as_str()),
        ("a", "aha"),
        ("b", "a bit longer, but not very much"),
    ];
    f.builder.zipmap_hash("h1", &h1);
    f.expect("h1", hash(&h1));
    f.builder.zipmap_hash("h2", &[("a", "101010")]);
    f.expect("h2", hash(&[("a", "101010")]));
    let h3 = [("b", "b2"), ("c", "c2"), ("d", "d")];
    f.builder.hash("h3", &h3);
    f.expect("h3", hash(&h3));

    let l1 = [ZipEntry::str("yup"), ZipEntry::str("aha")];
    f.builder.ziplist_list("l1", &l1);
    f.expect("l1", Value::List(decoded(&l1)));
    f.builder.set("set1", &["c", "d", "a", "b"]);
    f.expect("set1", Value::Set(items(&["c", "d", "a", "b"])));
    let l2 = ["something", "now a bit longer and perhaps more interesting"];
    f.builder.list("l2", &l2);
    f.expect("l2", Value::List(items(&l2)));
    f.builder.set("set2", &["d", "a"]);
    f.expect("set2", Value::Set(items(&["d", "a"])));
    f.builder.int_string("n1", -6);
    f.expect("n1", Value::String(b"-6".to_vec()));

    let dashes = format!("this one is going to be longer {}", "-".repeat(500));
    let l3 = [dashes.as_str(), "a bit more"];
    f.builder.list("l3", &l3);
    f.expect("l3", Value::List(items(&l3)));
    f.builder.set("set3", &["b"]);
    f.expect("set3", Value::Set(items(&["b"])));

    let set4: Vec<i64> = (1..=10).collect();
    f.builder.intset("set4", &set4);
    f.expect(
        "set4",
        Value::Set(set4.iter().map(|v| v.to_string().into_bytes()).collect()),
    );
    f.builder.int_string("n2", 501);
    f.expect("n2", Value::String(b"501".to_vec()));
    let l4 = [ZipEntry::str("b"), ZipEntry::str("c"), ZipEntry::str("d")];
    f.builder.ziplist_list("l4", &l4);
    f.expect("l4", Value::List(decoded(&l4)));

    for (key, values) in [
        ("set5", &[100_000, 100_001, 100_002, 100_003][..]),
        ("set6", &[9_999_999_997, 9_999_999_998, 9_999_999_999][..]),
    ] {
        f.builder.intset(key, values);
        f.expect(
            key,
            Value::Set(values.iter().map(|v| v.to_string().into_bytes()).collect()),
        );
    }
    f.builder.int_string("n3", 500_001);
    f.expect("n3", Value::String(b"500001".to_vec()));
    let l5 = [ZipEntry::str("c"), ZipEntry::str("a")];
    f.builder.ziplist_list("l5", &l5);
    f.expect("l5", Value::List(decoded(&l5)));
    f.builder.int_string("n4", 1);
    f.expect("n4", Value::String(b"1".to_vec()));
    f.builder.list("l6", &["b"]);
    f.expect("l6", Value::List(items(&["b"])));
    f.builder.int_string("n5", 1000);
    f.expect("n5", Value::String(b"1000".to_vec()));
    let l7 = [ZipEntry::str("a"), ZipEntry::str("b")];
    f.builder.ziplist_list("l7", &l7);
    f.expect("l7", Value::List(decoded(&l7)));
    f.builder.int_string("n6", 1_000_000);
    f.expect("n6", Value::String(b"1000000".to_vec()));
    f.builder.string("n4b", "1");
    f.expect("n4b", Value::String(b"1".to_vec()));

    let mut l8 = vec![ZipEntry::str("c")];
    l8.extend(ints(&[1, 2, 3, 4]));
    f.builder.ziplist_list("l8", &l8);
    f.expect("l8", Value::List(decoded(&l8)));
    let l9 = ints(&[10_001, 10_002, 10_003, 10_004]);
    f.builder.ziplist_list("l9", &l9);
    f.expect("l9", Value::List(decoded(&l9)));
    f.builder.string("n6b", "1000000");
    f.expect("n6b", Value::String(b"1000000".to_vec()));

    f.builder.sorted_set("z1", &[("a", "1"), ("c", "13")]);
    f.expect(
        "z1",
        Value::SortedSet(vec![ScoredMember::new("a", "1"), ScoredMember::new("c", "13")]),
    );
    for (key, values) in [
        ("z2", &[1, 1, 2, 2, 3, 3][..]),
        ("z3", &[10_002, 10_001, 10_003, 10_003][..]),
    ] {
        let entries = ints(values);
        f.builder.ziplist_sorted_set(key, &entries);
        f.expect(key, pairs_to_zset(&decoded(&entries)));
    }
    let z4 = [
        ("10000000001", "10000000001"),
        ("10000000002", "10000000002"),
        ("10000000003", "10000000003"),
    ];
    f.builder.sorted_set("z4", &z4);
    f.expect(
        "z4",
        Value::SortedSet(z4.iter().map(|(m, s)| ScoredMember::new(*m, *s)).collect()),
    );

    Ok((f.builder.encode()?, f.expected))
}
