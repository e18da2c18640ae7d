//! Stored accounts and the in-memory registry over them.

use crate::error::SyncResult;
use crate::store::MappingStore;

/// Credentials for one remote-service account. Accounts are created by
/// explicit add and never updated or deleted by the sync engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub secret: String,
}

/// In-memory view of the stored accounts, in load order.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: Vec<Account>,
}

impl AccountRegistry {
    pub fn new(accounts: Vec<Account>) -> Self {
        AccountRegistry { accounts }
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    /// Persist a new account, then add it to the in-memory set.
    /// The account only becomes visible once the insert succeeded.
    pub fn add(&mut self, store: &MappingStore, username: &str, secret: &str) -> SyncResult<()> {
        store.put_account(username, secret)?;
        self.accounts.push(Account {
            username: username.to_string(),
            secret: secret.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_persists_and_updates_memory() {
        let store = MappingStore::open_in_memory().unwrap();
        let mut registry = AccountRegistry::default();
        assert!(registry.is_empty());

        registry.add(&store, "alice", "pw123").unwrap();

        assert_eq!(registry.len(), 1);
        let account = registry.iter().next().unwrap();
        assert_eq!(account.username, "alice");
        assert_eq!(account.secret, "pw123");

        let snapshot = store.load_all().unwrap();
        assert_eq!(
            snapshot.accounts,
            vec![Account {
                username: "alice".to_string(),
                secret: "pw123".to_string(),
            }]
        );
    }

    #[test]
    fn iterates_in_load_order() {
        let registry = AccountRegistry::new(vec![
            Account {
                username: "alice".to_string(),
                secret: "a".to_string(),
            },
            Account {
                username: "bob".to_string(),
                secret: "b".to_string(),
            },
        ]);

        let usernames: Vec<_> = registry.iter().map(|a| a.username.as_str()).collect();
        assert_eq!(usernames, vec!["alice", "bob"]);
    }
}
