//! Property-based tests for certificates and packs.

use crate::certificate::{CertificateSigner, Keyring, Verification};
use crate::pack::build_pack;
use crate::test_support::clean_run;
use proptest::prelude::*;
use time::OffsetDateTime;

fn arb_issued_at() -> impl Strategy<Value = OffsetDateTime> {
    // 2001-09-09 .. 2033-05-18
    (1_000_000_000i64..2_000_000_000).prop_map(|ts| {
        OffsetDateTime::from_unix_timestamp(ts).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    })
}

proptest! {
    #[test]
    fn issued_certificates_verify_with_the_same_secret(
        key_id in "[a-z0-9-]{1,16}",
        secret in prop::collection::vec(any::<u8>(), 1..64),
        issued_at in arb_issued_at(),
    ) {
        let run = clean_run();
        let signer = CertificateSigner::new(key_id.clone(), secret.clone()).unwrap();
        let cert = signer.issue(&run.report, issued_at).unwrap();
        let ring = Keyring::new().with_key(key_id, secret).unwrap();
        prop_assert_eq!(ring.verify(&cert), Verification::Valid);
    }

    #[test]
    fn flipping_any_signature_nibble_fails(
        position in 0usize..64,
        secret in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let run = clean_run();
        let signer = CertificateSigner::new("k", secret.clone()).unwrap();
        let mut cert = signer.issue(&run.report, OffsetDateTime::UNIX_EPOCH).unwrap();
        let mut chars: Vec<char> = cert.signature.chars().collect();
        chars[position] = if chars[position] == '0' { '1' } else { '0' };
        cert.signature = chars.into_iter().collect();

        let ring = Keyring::new().with_key("k", secret).unwrap();
        prop_assert_eq!(ring.verify(&cert), Verification::InvalidSignature);
    }

    #[test]
    fn pack_bytes_do_not_depend_on_when_they_are_built(
        issued_at in arb_issued_at(),
    ) {
        let run = clean_run();
        let signer = CertificateSigner::new("k", b"s".to_vec()).unwrap();
        let cert = signer.issue(&run.report, issued_at).unwrap();
        let a = build_pack(&run, Some(&cert)).unwrap();
        let b = build_pack(&clean_run(), Some(&cert)).unwrap();
        prop_assert_eq!(a.manifest_bytes(), b.manifest_bytes());
    }
}
