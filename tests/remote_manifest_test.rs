//! Remote manifest intake tests
//!
//! A remote manifest is a flat JSON object of filename to lowercase-hex
//! SHA-256 digest. Malformed documents must be rejected before the diff
//! engine is ever involved: a `Manifest` value cannot hold an invalid
//! digest or a duplicate name.

use clipsync::manifest::Manifest;
use clipsync::SyncError;

const H1: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
const H2: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

fn reason_of(result: Result<Manifest, SyncError>) -> String {
	match result {
		Err(SyncError::MalformedManifest { reason }) => reason,
		Err(other) => panic!("expected MalformedManifest, got {}", other),
		Ok(_) => panic!("expected MalformedManifest, got a valid manifest"),
	}
}

#[test]
fn test_valid_document_accepted() {
	let json = format!(r#"{{"clip1.mov": "{}", "clip2.mov": "{}"}}"#, H1, H2);
	let manifest = Manifest::from_json_str(&json).unwrap();
	assert_eq!(manifest.len(), 2);
	assert_eq!(manifest.get("clip1.mov"), Some(H1));
	assert_eq!(manifest.get("clip2.mov"), Some(H2));
}

#[test]
fn test_empty_document_accepted() {
	let manifest = Manifest::from_json_str("{}").unwrap();
	assert!(manifest.is_empty());
}

#[test]
fn test_non_hex_digest_rejected() {
	let reason = reason_of(Manifest::from_json_str(r#"{"y.jpg": "zz"}"#));
	assert!(reason.contains("y.jpg"), "reason should name the entry: {}", reason);
}

#[test]
fn test_truncated_digest_rejected() {
	let json = format!(r#"{{"y.jpg": "{}"}}"#, &H1[..63]);
	let reason = reason_of(Manifest::from_json_str(&json));
	assert!(reason.contains("63"), "reason should report the length: {}", reason);
}

#[test]
fn test_uppercase_digest_rejected() {
	let json = format!(r#"{{"y.jpg": "{}"}}"#, H1.to_uppercase());
	reason_of(Manifest::from_json_str(&json));
}

#[test]
fn test_duplicate_keys_rejected() {
	let json = format!(r#"{{"a.jpg": "{}", "a.jpg": "{}"}}"#, H1, H2);
	let reason = reason_of(Manifest::from_json_str(&json));
	assert!(reason.contains("duplicate"), "reason should mention the duplicate: {}", reason);
}

#[test]
fn test_non_object_document_rejected() {
	assert!(Manifest::from_json_str("[1, 2]").is_err());
	assert!(Manifest::from_json_str("\"digest\"").is_err());
	assert!(Manifest::from_json_str("not json at all").is_err());
}

#[test]
fn test_filenames_are_case_sensitive_opaque_strings() {
	let json = format!(r#"{{"Clip.MOV": "{}", "clip.mov": "{}"}}"#, H1, H2);
	let manifest = Manifest::from_json_str(&json).unwrap();
	assert_eq!(manifest.len(), 2);
	assert_eq!(manifest.get("Clip.MOV"), Some(H1));
	assert_eq!(manifest.get("clip.mov"), Some(H2));
}

// vim: ts=4
