use recordgate_crypto::{Argon2Hasher, HashError, HashParams, PasswordHasher};

fn test_params() -> HashParams {
    HashParams {
        memory_cost: 1024,
        time_cost: 1,
        parallelism: 1,
    }
}

fn hasher() -> Argon2Hasher {
    Argon2Hasher::new(test_params()).unwrap()
}

// ── hash ─────────────────────────────────────────────────────────

#[test]
fn hash_is_phc_argon2id_string() {
    let hashed = hasher().hash("secret").unwrap();
    assert!(hashed.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
}

#[test]
fn hash_differs_from_plaintext() {
    let hashed = hasher().hash("hunter2").unwrap();
    assert_ne!(hashed, "hunter2");
    assert!(!hashed.contains("hunter2"));
}

#[test]
fn same_password_gets_fresh_salt() {
    let h = hasher();
    assert_ne!(h.hash("same").unwrap(), h.hash("same").unwrap());
}

#[test]
fn output_length_is_fixed_for_fixed_params() {
    let h = hasher();
    let short = h.hash("a").unwrap();
    let long = h.hash(&"x".repeat(500)).unwrap();
    assert_eq!(short.len(), long.len());
}

#[test]
fn empty_password_can_be_hashed() {
    let h = hasher();
    let hashed = h.hash("").unwrap();
    assert!(h.verify("", &hashed).unwrap());
}

// ── verify ───────────────────────────────────────────────────────

#[test]
fn verify_accepts_correct_password() {
    let h = hasher();
    let hashed = h.hash("correct horse").unwrap();
    assert!(h.verify("correct horse", &hashed).unwrap());
}

#[test]
fn verify_rejects_wrong_password() {
    let h = hasher();
    let hashed = h.hash("correct horse").unwrap();
    assert!(!h.verify("battery staple", &hashed).unwrap());
}

#[test]
fn verify_works_across_param_changes() {
    let old = hasher();
    let hashed = old.hash("pw").unwrap();
    let new = Argon2Hasher::new(HashParams {
        memory_cost: 2048,
        time_cost: 2,
        parallelism: 1,
    })
    .unwrap();
    assert!(new.verify("pw", &hashed).unwrap());
}

#[test]
fn verify_malformed_hash_is_error() {
    let err = hasher().verify("pw", "not-a-hash").unwrap_err();
    assert!(matches!(err, HashError::MalformedHash(_)));
}

// ── needs_rehash ─────────────────────────────────────────────────

#[test]
fn fresh_hash_does_not_need_rehash() {
    let h = hasher();
    let hashed = h.hash("pw").unwrap();
    assert!(!h.needs_rehash(&hashed));
}

#[test]
fn changed_params_need_rehash() {
    let hashed = hasher().hash("pw").unwrap();
    let stronger = Argon2Hasher::new(HashParams {
        memory_cost: 4096,
        time_cost: 1,
        parallelism: 1,
    })
    .unwrap();
    assert!(stronger.needs_rehash(&hashed));
}

#[test]
fn garbage_needs_rehash() {
    assert!(hasher().needs_rehash("plaintext-password"));
}

#[test]
fn other_argon2_variant_needs_rehash() {
    let argon2i = "$argon2i$v=19$m=1024,t=1,p=1$c29tZXNhbHRzb21lc2FsdA$\
                   aGFzaGhhc2hoYXNoaGFzaGhhc2hoYXNoaGFzaGhhc2g";
    assert!(hasher().needs_rehash(argon2i));
}

// ── HashParams ───────────────────────────────────────────────────

#[test]
fn default_params_follow_owasp() {
    let params = HashParams::default();
    assert_eq!(params.memory_cost, 19 * 1024);
    assert_eq!(params.time_cost, 2);
    assert_eq!(params.parallelism, 1);
}

#[test]
fn default_hasher_uses_default_params() {
    assert_eq!(Argon2Hasher::default().params(), &HashParams::default());
}

#[test]
fn zero_time_cost_is_rejected() {
    let err = Argon2Hasher::new(HashParams {
        memory_cost: 1024,
        time_cost: 0,
        parallelism: 1,
    })
    .unwrap_err();
    assert!(matches!(err, HashError::InvalidParams(_)));
}

#[test]
fn debug_does_not_panic() {
    let dbg = format!("{:?}", hasher());
    assert!(dbg.contains("Argon2Hasher"));
}
