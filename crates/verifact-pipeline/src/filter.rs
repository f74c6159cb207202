//! Claim selection between detection and evidence gathering

use verifact_domain::{Claim, FactCheckOptions};

/// Select the claims that proceed to evidence gathering
///
/// A claim is kept when its check-worthiness reaches the threshold and its
/// domain is one of the requested domains. Detection order is preserved and
/// selection stops once `max_claims` claims are kept; later qualifying
/// claims are dropped without re-sorting.
///
/// # Examples
///
/// ```
/// use verifact_domain::{Claim, FactCheckOptions};
/// use verifact_pipeline::filter_claims;
///
/// let claims = vec![
///     Claim::new("GDP grew 3%", 0.9, "economics"),
///     Claim::new("I like tea", 0.1, "general"),
/// ];
/// let kept = filter_claims(&claims, &FactCheckOptions::default());
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].text, "GDP grew 3%");
/// ```
pub fn filter_claims(claims: &[Claim], options: &FactCheckOptions) -> Vec<Claim> {
    claims
        .iter()
        .filter(|claim| {
            claim.check_worthiness >= options.min_check_worthiness
                && options.domains.contains(&claim.domain)
        })
        .take(options.max_claims)
        .cloned()
        .collect()
}
