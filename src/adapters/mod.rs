/// Adapters - implementations of the port traits
///
/// These modules implement the port traits for specific external services.
pub mod oracle;
