//! Parameter files written and read back from disk

use std::fs;

use common::crypto::{Group, PrivateKey, DEFAULT_MR_ROUNDS, GROUP1, GROUP14};
use rand::rngs::OsRng;
use tempfile::TempDir;

#[test]
fn test_pem_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dhparams.pem");

    fs::write(&path, GROUP14.to_pem()).unwrap();
    let loaded = Group::from_pem(&fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(loaded, *GROUP14);
    assert!(loaded.check(DEFAULT_MR_ROUNDS, &mut OsRng).unwrap().is_sound());
}

#[test]
fn test_loaded_group_interoperates_with_builtin() {
    let loaded = Group::from_pem(&GROUP1.to_pem()).unwrap();

    let a = PrivateKey::generate(&mut OsRng, &loaded).unwrap();
    let b = PrivateKey::generate(&mut OsRng, &GROUP1).unwrap();
    assert_eq!(
        a.compute_secret(b.public()).to_bytes_be(),
        b.compute_secret(a.public()).to_bytes_be()
    );
}

#[test]
fn test_openssl_style_pem() {
    // p = 23, g = 2 in the layout `openssl dhparam` writes
    let pem = "-----BEGIN DH PARAMETERS-----\nMAYCARcCAQI=\n-----END DH PARAMETERS-----\n";
    let group = Group::from_pem(pem).unwrap();
    assert_eq!(group, Group::from_hex("17", 2).unwrap());
}
