/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the outbound ports,
/// providing the actual integration with repository hosts, the OSV API,
/// the local filesystem and the console.
pub mod outbound;
