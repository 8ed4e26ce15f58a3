use std::sync::Arc;

use proptest::prelude::*;

use crate::{ElementName, InternError, Name, NameTable};

#[test]
fn interning_equal_text_returns_same_atom() {
	let table = NameTable::new();
	let a = table.intern("xmlConverter");
	let owned = String::from("xml") + "Converter";
	let b = table.intern(&owned);

	assert!(Name::ptr_eq(&a, &b));
	assert_eq!(table.len(), 1);
}

#[test]
fn distinct_text_never_shares_an_atom() {
	let table = NameTable::new();
	let a = table.intern("Old");
	let b = table.intern("old");

	assert!(!Name::ptr_eq(&a, &b));
	assert_ne!(a, b);
}

#[test]
fn get_does_not_insert() {
	let table = NameTable::new();
	assert!(table.get("settings").is_none());
	assert!(table.is_empty());

	let interned = table.intern("settings");
	let found = table.get("settings").expect("interned above");
	assert!(Name::ptr_eq(&interned, &found));
}

#[test]
fn atoms_from_different_tables_compare_by_content() {
	let left = NameTable::new();
	let right = NameTable::new();
	let a = left.intern("Mid");
	let b = right.intern("Mid");

	assert!(!Name::ptr_eq(&a, &b));
	assert_eq!(a, b);
	assert!(left.owns(&a));
	assert!(!left.owns(&b));
}

#[test]
fn element_names_from_same_content_are_identical() {
	let table = NameTable::new();
	let a = ElementName::new(&table, "urn:ns1", "Old").unwrap();
	let b = ElementName::new(&table, "urn:ns1", "Old").unwrap();

	assert_eq!(a, b);
	assert!(a.is(b.namespace(), b.local_name()));
}

#[test]
fn element_names_with_different_local_names_differ() {
	let table = NameTable::new();
	let a = ElementName::new(&table, "urn:ns1", "Old").unwrap();
	let b = ElementName::new(&table, "urn:ns1", "Mid").unwrap();

	assert_ne!(a, b);
	assert!(!a.is(b.namespace(), b.local_name()));
}

#[test]
fn empty_local_name_is_rejected() {
	let table = NameTable::new();
	assert_eq!(ElementName::new(&table, "urn:ns1", ""), Err(InternError::EmptyLocalName));
}

#[test]
fn clark_notation_parses_and_displays() {
	let table = NameTable::new();
	let qualified = ElementName::from_clark(&table, "{urn:ns1}Current").unwrap();
	assert_eq!(qualified.namespace().as_str(), "urn:ns1");
	assert_eq!(qualified.local_name().as_str(), "Current");
	assert_eq!(qualified.to_string(), "{urn:ns1}Current");

	let bare = ElementName::from_clark(&table, "Current").unwrap();
	assert!(bare.namespace().is_empty());
	assert_eq!(bare.to_string(), "Current");
}

#[test]
fn malformed_clark_notation_is_rejected() {
	let table = NameTable::new();
	assert!(matches!(
		ElementName::from_clark(&table, "{urn:ns1Current"),
		Err(InternError::InvalidClarkName(_))
	));
	assert!(matches!(
		ElementName::from_clark(&table, "a}b"),
		Err(InternError::InvalidClarkName(_))
	));
	assert_eq!(ElementName::from_clark(&table, "{urn:ns1}"), Err(InternError::EmptyLocalName));
}

#[test]
fn concurrent_interning_converges_on_one_atom() {
	let table = Arc::new(NameTable::new());
	let handles: Vec<_> = (0..8)
		.map(|_| {
			let table = Arc::clone(&table);
			std::thread::spawn(move || table.intern("transformParameter"))
		})
		.collect();
	let atoms: Vec<Name> = handles.into_iter().map(|h| h.join().unwrap()).collect();

	assert!(atoms.windows(2).all(|pair| Name::ptr_eq(&pair[0], &pair[1])));
	assert_eq!(table.len(), 1);
}

#[test]
fn rebind_moves_names_into_another_table() {
	let first = NameTable::new();
	let second = NameTable::new();
	let name = ElementName::from_clark(&first, "{urn:a}Model").unwrap();
	let moved = name.rebind(&second);

	assert_eq!(moved, name);
	assert!(second.owns(moved.namespace()));
	assert!(!first.owns(moved.local_name()));
}

#[test]
fn global_table_is_shared() {
	let a = NameTable::global().intern("ladder-global-probe");
	let b = NameTable::global().intern("ladder-global-probe");
	assert!(Name::ptr_eq(&a, &b));
}

proptest! {
	#[test]
	fn identity_matches_content_equality(a in "[a-zA-Z:_.-]{0,12}", b in "[a-zA-Z:_.-]{0,12}") {
		let table = NameTable::new();
		let x = table.intern(&a);
		let y = table.intern(&b);
		prop_assert_eq!(Name::ptr_eq(&x, &y), a == b);
	}
}
