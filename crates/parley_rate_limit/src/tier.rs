//! Tier trait for representing API rate limit constraints.

/// Represents the quota of an API tier.
///
/// All methods return `Option<T>` where `None` indicates unlimited.
///
/// # Example
///
/// ```
/// use parley_rate_limit::Tier;
///
/// struct Sandbox;
///
/// impl Tier for Sandbox {
///     fn rpm(&self) -> Option<u32> { Some(5) }
///     fn tpm(&self) -> Option<u64> { Some(10_000) }
///     fn rpd(&self) -> Option<u32> { None }
///     fn name(&self) -> &str { "Sandbox" }
/// }
///
/// assert_eq!(Sandbox.rpm(), Some(5));
/// ```
pub trait Tier: Send + Sync {
    /// Requests per minute limit.
    fn rpm(&self) -> Option<u32>;

    /// Tokens per minute limit.
    ///
    /// Reported against, never enforced.
    fn tpm(&self) -> Option<u64>;

    /// Requests per day limit.
    fn rpd(&self) -> Option<u32>;

    /// Name of the tier (e.g., "Free", "Pay-as-you-go").
    fn name(&self) -> &str;
}
