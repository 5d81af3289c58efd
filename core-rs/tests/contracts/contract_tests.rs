//! Contract Tests - Query and Chain Invariant Protection
//!
//! This file aggregates all contract test modules.
//! Contract tests verify invariants that MUST NEVER BREAK.

// Contract test modules
mod contracts {
    // Query text and builder contracts
    mod query {
        include!("query_contracts.rs");
    }

    // Result mapping and chain reconstruction contracts
    mod chain {
        include!("chain_contracts.rs");
    }

    // Property-based builder and chain contracts
    mod properties {
        include!("property_contracts.rs");
    }
}
