//! Static intent-to-operation mapping
//!
//! One descriptor per known intent, built once at startup and injected into
//! the router so tests can substitute alternate tables. Lookups are total:
//! unknown intents resolve to a fail-closed default descriptor instead of an
//! error.

use std::collections::HashMap;

/// Banking operation bound to a recognized intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Whether the caller must be authenticated before this operation runs
    pub requires_auth: bool,
    /// REST endpoint the caller invokes once routing approves the action
    pub api_endpoint: Option<String>,
    /// Permission the authenticated user needs, e.g. "read:balance"
    pub permission: Option<String>,
}

impl OperationDescriptor {
    pub fn new(
        requires_auth: bool,
        api_endpoint: Option<&str>,
        permission: Option<&str>,
    ) -> Self {
        Self {
            requires_auth,
            api_endpoint: api_endpoint.map(str::to_string),
            permission: permission.map(str::to_string),
        }
    }

    /// Fail-closed descriptor used for intents missing from the table
    pub fn fail_closed() -> Self {
        Self {
            requires_auth: true,
            api_endpoint: None,
            permission: None,
        }
    }

    /// True when the permission denotes a financial mutation (transfer,
    /// payment, card block, dispute, fraud report). Mutations are never
    /// auto-executed no matter how confident the provider was.
    pub fn is_sensitive(&self) -> bool {
        self.permission
            .as_deref()
            .is_some_and(|p| p.starts_with("write:"))
    }
}

/// Immutable intent-to-operation lookup table
#[derive(Debug, Clone)]
pub struct OperationTable {
    entries: HashMap<String, OperationDescriptor>,
    default: OperationDescriptor,
}

impl OperationTable {
    pub fn new(entries: HashMap<String, OperationDescriptor>) -> Self {
        Self {
            entries,
            default: OperationDescriptor::fail_closed(),
        }
    }

    /// The production banking intent set
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();

        entries.insert(
            "auth.login".to_string(),
            OperationDescriptor::new(false, Some("/api/auth/login"), None),
        );
        entries.insert(
            "account.balance".to_string(),
            OperationDescriptor::new(true, Some("/api/accounts/balance"), Some("read:balance")),
        );
        entries.insert(
            "transaction.history".to_string(),
            OperationDescriptor::new(true, Some("/api/transactions"), Some("read:transactions")),
        );
        entries.insert(
            "payment.transfer".to_string(),
            OperationDescriptor::new(true, Some("/api/balance-transfers"), Some("write:transfer")),
        );
        entries.insert(
            "payment.bill".to_string(),
            OperationDescriptor::new(true, Some("/api/payments/bill"), Some("write:payment")),
        );
        entries.insert(
            "card.status".to_string(),
            OperationDescriptor::new(true, Some("/api/cards"), Some("read:cards")),
        );
        entries.insert(
            "card.block".to_string(),
            OperationDescriptor::new(true, Some("/api/cards/block"), Some("write:card")),
        );
        entries.insert(
            "dispute.create".to_string(),
            OperationDescriptor::new(true, Some("/api/disputes"), Some("write:dispute")),
        );
        entries.insert(
            "fraud.report".to_string(),
            OperationDescriptor::new(true, Some("/api/fraud/report"), Some("write:fraud")),
        );
        entries.insert(
            "account.statement".to_string(),
            OperationDescriptor::new(true, Some("/api/accounts/statement"), Some("read:statement")),
        );
        entries.insert(
            "general.greeting".to_string(),
            OperationDescriptor::new(false, None, None),
        );
        entries.insert(
            "general.help".to_string(),
            OperationDescriptor::new(false, None, None),
        );

        Self::new(entries)
    }

    /// Resolve an intent name to its descriptor. Total: unknown intents get
    /// the fail-closed default, never an error.
    pub fn lookup(&self, intent: &str) -> &OperationDescriptor {
        self.entries.get(intent).unwrap_or(&self.default)
    }

    /// Whether the intent has an explicit entry
    pub fn contains(&self, intent: &str) -> bool {
        self.entries.contains_key(intent)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Known intent names, for diagnostics
    pub fn intent_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for OperationTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_total() {
        let table = OperationTable::builtin();

        let known = table.lookup("account.balance");
        assert!(known.requires_auth);
        assert_eq!(known.api_endpoint.as_deref(), Some("/api/accounts/balance"));
        assert_eq!(known.permission.as_deref(), Some("read:balance"));

        let unknown = table.lookup("foo.bar");
        assert_eq!(*unknown, OperationDescriptor::fail_closed());
        assert!(unknown.requires_auth);
        assert!(unknown.api_endpoint.is_none());
        assert!(unknown.permission.is_none());
    }

    #[test]
    fn test_every_builtin_intent_resolves() {
        let table = OperationTable::builtin();
        assert_eq!(table.len(), 12);

        let names: Vec<String> = table.intent_names().map(str::to_string).collect();
        for name in names {
            assert!(table.contains(&name));
            let _ = table.lookup(&name);
        }
    }

    #[test]
    fn test_sensitive_operations_are_the_write_permissions() {
        let table = OperationTable::builtin();

        for intent in [
            "payment.transfer",
            "payment.bill",
            "card.block",
            "dispute.create",
            "fraud.report",
        ] {
            assert!(table.lookup(intent).is_sensitive(), "{} should be sensitive", intent);
        }

        for intent in [
            "auth.login",
            "account.balance",
            "transaction.history",
            "card.status",
            "account.statement",
            "general.greeting",
            "general.help",
        ] {
            assert!(!table.lookup(intent).is_sensitive(), "{} should not be sensitive", intent);
        }
    }

    #[test]
    fn test_greeting_needs_no_auth_or_endpoint() {
        let table = OperationTable::builtin();
        let greeting = table.lookup("general.greeting");
        assert!(!greeting.requires_auth);
        assert!(greeting.api_endpoint.is_none());
    }
}
