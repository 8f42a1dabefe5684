use seqstore::{Version, Versioned};
use seqstore_macros::versioned;

#[versioned]
struct Account {
    owner: String,
    balance: i64,
}

// 已有的 version 字段与 derive 应被复用而不是重复
#[versioned]
#[derive(PartialEq, Debug, Clone)]
struct Ledger {
    entries: Vec<i64>,
    version: Version,
}

#[versioned(debug = false)]
struct Secret {
    token: String,
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret(..)")
    }
}

fn main() {
    let mut account = Account::default();
    assert!(account.version().is_new());
    account.increment_version();
    assert_eq!(account.version(), Version::from_value(1));
    let _ = (account.owner.clone(), account.balance);

    let ledger = Ledger::default();
    assert_eq!(ledger.clone(), ledger);
    let json = serde_json::to_value(&ledger).unwrap();
    assert_eq!(json["version"], 0);

    let secret = Secret::default();
    assert_eq!(format!("{:?}", secret), "Secret(..)");
    let _ = secret.token.len();
}
