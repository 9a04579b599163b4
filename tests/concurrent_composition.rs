//! Concurrent composition tests
//!
//! Compositions share nothing mutable, so one composer or one parsed base
//! document may be used from many threads at once.

use policy_composer::{
    merge, LocalDocument, PolicyComposer, PolicyDocument, PolicyVersion, StatementDeclaration,
};
use std::sync::Arc;

const BASE: &str = r#"{
  "Version": "2012-10-17",
  "Id": "shared",
  "Statement": [
    {"Sid": "Read", "Action": "s3:GetObject", "Resource": "arn:aws:s3:::shared/*"},
    {"Action": "s3:ListBucket", "Resource": "arn:aws:s3:::shared"}
  ]
}"#;

fn local_for(user: usize) -> LocalDocument {
    LocalDocument::new(PolicyVersion::V2012_10_17)
        .with_id(format!("user-{}", user))
        .with_statement(
            StatementDeclaration::allow(
                ["s3:PutObject", "s3:GetObject"],
                [format!("arn:aws:s3:::shared/home/user-{}/*", user)],
            )
            .with_sid("Home"),
        )
}

#[test]
fn test_shared_composer_across_threads() {
    let composer = Arc::new(PolicyComposer::new().base_json(BASE).local(local_for(0)));
    let expected = composer.compose().unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let composer = composer.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    let composed = composer.compose().unwrap();
                    assert!(composed.json.contains("user-0"));
                }
                composer.compose().unwrap()
            })
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}

#[test]
fn test_shared_base_document_not_aliased() {
    let base = Arc::new(PolicyDocument::from_json(BASE).unwrap());
    let pristine = (*base).clone();

    let handles: Vec<_> = (0..8)
        .map(|user| {
            let base = base.clone();
            std::thread::spawn(move || {
                let local = local_for(user).build().unwrap();
                let merged = merge(&base, &local);
                assert_eq!(merged.id, format!("user-{}", user));
                assert_eq!(merged.statement.len(), 3);
                merged
            })
        })
        .collect();

    let results: Vec<PolicyDocument> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // Every thread saw the same untouched base
    assert_eq!(*base, pristine);
    for (user, merged) in results.iter().enumerate() {
        assert_eq!(merged.statement[0], pristine.statement[0]);
        assert!(merged.statement[2]
            .resource
            .contains(&format!("arn:aws:s3:::shared/home/user-{}/*", user)));
    }
}
