//! Deterministic resolvers for questions with an exact answer in the data.
//!
//! Resolvers form an ordered chain. The first resolver whose trigger matches
//! the question runs, and only that one: if it declines, the question goes to
//! the generation fallback rather than to the next resolver.

use crate::answer::{QueryAnswer, HOURS_UNAVAILABLE};
use crate::hours::{extract_latest_closing, format_minutes};
use crate::store::Outlet;
use crate::vocabulary::LocationVocabulary;
use std::sync::Arc;
use tracing::debug;

/// Outcome of running a triggered resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Answered(QueryAnswer),
    /// The resolver cannot answer exactly; fall back to generation.
    Declined,
}

/// A rule that answers one class of question directly from outlet data.
pub trait Resolver: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Whether this resolver is responsible for `question`.
    fn is_triggered_by(&self, question: &str) -> bool;

    /// Answer `question` over the outlet snapshot.
    fn resolve(&self, question: &str, outlets: &[Outlet]) -> Resolution;
}

fn mentions_any(question: &str, phrases: &[&str]) -> bool {
    let question = question.to_lowercase();
    phrases.iter().any(|p| question.contains(p))
}

/// Counts outlets in the first known location named by the question.
pub struct CountingResolver {
    vocabulary: Arc<LocationVocabulary>,
}

impl CountingResolver {
    const TRIGGERS: &'static [&'static str] = &["how many", "count"];

    pub fn new(vocabulary: Arc<LocationVocabulary>) -> Self {
        Self { vocabulary }
    }
}

impl Resolver for CountingResolver {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn is_triggered_by(&self, question: &str) -> bool {
        mentions_any(question, Self::TRIGGERS)
    }

    fn resolve(&self, question: &str, outlets: &[Outlet]) -> Resolution {
        let Some(location) = self.vocabulary.find_in(question) else {
            // An unknown place must not be answered with "0 outlets".
            debug!("No known location in question, declining");
            return Resolution::Declined;
        };

        let count = outlets
            .iter()
            .filter(|o| o.has_name())
            .filter_map(Outlet::address)
            .filter(|address| location.matches(address))
            .count();

        Resolution::Answered(QueryAnswer::resolved(format!(
            "{} outlets in {}",
            count,
            location.name()
        )))
    }
}

/// Names the outlet(s) with the latest closing time.
#[derive(Default)]
pub struct LatestClosingResolver;

impl LatestClosingResolver {
    const TRIGGERS: &'static [&'static str] = &["closes latest", "latest closing"];
}

impl Resolver for LatestClosingResolver {
    fn name(&self) -> &'static str {
        "latest_closing"
    }

    fn is_triggered_by(&self, question: &str) -> bool {
        mentions_any(question, Self::TRIGGERS)
    }

    fn resolve(&self, _question: &str, outlets: &[Outlet]) -> Resolution {
        let closing: Vec<(&Outlet, u16)> = outlets
            .iter()
            .filter(|o| o.has_name())
            .filter_map(|o| o.hours().and_then(extract_latest_closing).map(|m| (o, m)))
            .collect();

        let Some(latest) = closing.iter().map(|&(_, m)| m).max() else {
            return Resolution::Answered(QueryAnswer::unavailable(HOURS_UNAVAILABLE));
        };

        let names: Vec<&str> = closing
            .iter()
            .filter(|&&(_, m)| m == latest)
            .map(|(o, _)| o.name.as_str())
            .collect();

        debug!(
            "Latest closing time {} shared by {} outlet(s)",
            format_minutes(latest),
            names.len()
        );

        let answer = match names.as_slice() {
            [single] => format!("{} - Closes latest", single),
            _ => format!("These outlets close latest: {}", names.join(", ")),
        };
        Resolution::Answered(QueryAnswer::resolved(answer))
    }
}

/// Ordered list of resolvers; the first triggered one decides.
pub struct ResolverChain {
    resolvers: Vec<Box<dyn Resolver>>,
}

impl ResolverChain {
    pub fn new(resolvers: Vec<Box<dyn Resolver>>) -> Self {
        Self { resolvers }
    }

    /// Counting first, then latest closing.
    pub fn standard(vocabulary: Arc<LocationVocabulary>) -> Self {
        Self::new(vec![
            Box::new(CountingResolver::new(vocabulary)),
            Box::new(LatestClosingResolver),
        ])
    }

    /// The first resolver triggered by `question`, if any.
    pub fn classify(&self, question: &str) -> Option<&dyn Resolver> {
        self.resolvers
            .iter()
            .find(|r| r.is_triggered_by(question))
            .map(|r| r.as_ref())
    }

    /// Run the first triggered resolver. `None` when no resolver is triggered.
    pub fn evaluate(&self, question: &str, outlets: &[Outlet]) -> Option<(&'static str, Resolution)> {
        let resolver = self.classify(question)?;
        Some((resolver.name(), resolver.resolve(question, outlets)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::AnswerKind;

    fn vocabulary() -> Arc<LocationVocabulary> {
        Arc::new(LocationVocabulary::new(["Bangsar", "KLCC", "Cheras"]))
    }

    fn counting_outlets() -> Vec<Outlet> {
        vec![
            Outlet::new(1, "Subway Telawi", "1 Jalan Bangsar"),
            Outlet::new(2, "Subway Maarof", "2 Jalan Bangsar"),
            Outlet::new(3, "Subway Suria", "3 KLCC Tower"),
        ]
    }

    fn answer(resolution: Resolution) -> QueryAnswer {
        match resolution {
            Resolution::Answered(answer) => answer,
            Resolution::Declined => panic!("resolver declined"),
        }
    }

    #[test]
    fn test_counting_by_location() {
        let resolver = CountingResolver::new(vocabulary());
        let question = "how many outlets in Bangsar";
        assert!(resolver.is_triggered_by(question));

        let result = answer(resolver.resolve(question, &counting_outlets()));
        assert_eq!(result.answer, "2 outlets in Bangsar");
        assert_eq!(result.kind, AnswerKind::Resolved);
    }

    #[test]
    fn test_counting_known_location_with_no_outlets_is_zero() {
        let resolver = CountingResolver::new(vocabulary());
        let result = answer(resolver.resolve("Count outlets in cheras", &counting_outlets()));
        assert_eq!(result.answer, "0 outlets in Cheras");
    }

    #[test]
    fn test_counting_unknown_location_declines() {
        let resolver = CountingResolver::new(vocabulary());
        let resolution = resolver.resolve("how many outlets in Timbuktu", &counting_outlets());
        assert_eq!(resolution, Resolution::Declined);
    }

    #[test]
    fn test_counting_skips_nameless_outlets() {
        let mut outlets = counting_outlets();
        outlets[1].name = "  ".to_string();
        let resolver = CountingResolver::new(vocabulary());
        let result = answer(resolver.resolve("how many outlets in Bangsar", &outlets));
        assert_eq!(result.answer, "1 outlets in Bangsar");
    }

    #[test]
    fn test_counting_skips_outlets_without_address() {
        let mut outlets = counting_outlets();
        outlets[0].address = None;
        let resolver = CountingResolver::new(vocabulary());
        let result = answer(resolver.resolve("how many in bangsar?", &outlets));
        assert_eq!(result.answer, "1 outlets in Bangsar");
    }

    #[test]
    fn test_latest_closing_single_winner() {
        let outlets = vec![
            Outlet::new(1, "Subway A", "a").with_hours("8AM - 10PM"),
            Outlet::new(2, "Subway B", "b").with_hours("08:00 - 22:30"),
            Outlet::new(3, "Subway C", "c").with_hours("24 Hours"),
        ];
        let result = answer(LatestClosingResolver.resolve("which closes latest", &outlets));
        assert_eq!(result.answer, "Subway B - Closes latest");
    }

    #[test]
    fn test_latest_closing_reports_all_ties_in_order() {
        let outlets = vec![
            Outlet::new(1, "Subway A", "a").with_hours("Mon-Sun: 8AM - 10PM"),
            Outlet::new(2, "Subway B", "b").with_hours("9AM - 9PM"),
            Outlet::new(3, "Subway C", "c").with_hours("10:00 - 22:00"),
        ];
        let result = answer(LatestClosingResolver.resolve("latest closing outlet?", &outlets));
        assert_eq!(result.answer, "These outlets close latest: Subway A, Subway C");
    }

    #[test]
    fn test_latest_closing_without_hours_is_unavailable() {
        let mut outlets = vec![
            Outlet::new(1, "Subway A", "a").with_hours("24 Hours"),
            Outlet::new(2, "Subway B", "b"),
        ];
        // A nameless record is skipped even though its hours parse.
        outlets.push(Outlet::new(3, " ", "c").with_hours("8AM - 11PM"));

        let result = answer(LatestClosingResolver.resolve("which closes latest", &outlets));
        assert_eq!(result.kind, AnswerKind::Unavailable);
        assert_eq!(result.answer, HOURS_UNAVAILABLE);
    }

    #[test]
    fn test_chain_order_and_no_cross_fallthrough() {
        let chain = ResolverChain::standard(vocabulary());

        // Both triggers present: counting wins and its decline is final.
        let (name, resolution) = chain
            .evaluate("how many outlets in Timbuktu and which closes latest", &counting_outlets())
            .unwrap();
        assert_eq!(name, "counting");
        assert_eq!(resolution, Resolution::Declined);

        let (name, _) = chain.evaluate("Which outlet CLOSES LATEST?", &[]).unwrap();
        assert_eq!(name, "latest_closing");

        assert!(chain.evaluate("Where can I buy a sandwich?", &[]).is_none());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let chain = ResolverChain::standard(vocabulary());
        let outlets = counting_outlets();
        let first = chain.evaluate("how many outlets in KLCC", &outlets);
        let second = chain.evaluate("how many outlets in KLCC", &outlets);
        assert_eq!(first, second);
    }
}
