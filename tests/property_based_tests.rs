mod common;

use common::*;
use opener_core::opener::{OpenerService, OPEN_HANDLER};
use opener_core::prioritizer::{is_valid_priority, prioritize_all, prioritize_all_sync};
use opener_core::registry::StaticContributionProvider;
use opener_core::Uri;
use proptest::prelude::*;
use std::sync::Arc;

/// Indices of candidates in the order the ranking contract demands
fn expected_order(scores: &[Option<f64>]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len())
        .filter(|&i| scores[i].is_some_and(is_valid_priority))
        .collect();
    // Stable: equal scores keep their index order
    indices.sort_by(|&a, &b| {
        let (a, b) = (scores[a].unwrap_or(0.0), scores[b].unwrap_or(0.0));
        b.total_cmp(&a)
    });
    indices
}

proptest! {
    /// Property: ranking keeps exactly the positive scores, best first, ties stable
    #[test]
    fn ranking_matches_contract(scores in fallible_score_set_strategy()) {
        let candidates: Vec<usize> = (0..scores.len()).collect();
        let ranked = tokio_test::block_on(prioritize_all(candidates, |index| {
            let outcome = scores[*index];
            async move { outcome.ok_or("scorer failed") }
        }));

        let order: Vec<usize> = ranked.iter().map(|p| p.value).collect();
        prop_assert_eq!(order, expected_order(&scores));
        prop_assert!(ranked.iter().all(|p| p.priority > 0.0));
        prop_assert!(ranked.windows(2).all(|pair| pair[0].priority >= pair[1].priority));
    }

    /// Property: sync and async ranking agree
    #[test]
    fn sync_and_async_agree(scores in fallible_score_set_strategy()) {
        let candidates: Vec<usize> = (0..scores.len()).collect();
        let asynchronous = tokio_test::block_on(prioritize_all(candidates.clone(), |index| {
            let outcome = scores[*index];
            async move { outcome.ok_or("scorer failed") }
        }));
        let synchronous = prioritize_all_sync(candidates, |index| scores[*index].ok_or("scorer failed"));

        prop_assert_eq!(asynchronous, synchronous);
    }

    /// Property: the winner is the first registered handler with the top score
    #[test]
    fn winner_is_earliest_maximum(scores in score_set_strategy()) {
        let handlers: Vec<Arc<MockHandler>> = scores
            .iter()
            .enumerate()
            .map(|(i, score)| MockHandler::scoring(&format!("h{i}"), *score))
            .collect();
        let refs: Vec<&Arc<MockHandler>> = handlers.iter().collect();
        let service = OpenerService::new(Arc::new(StaticContributionProvider::from_instances(
            as_handlers(&refs),
        )));

        let result = tokio_test::block_on(service.get_opener(&Uri::new("file:///prop"), None));

        let best = scores
            .iter()
            .copied()
            .filter(|score| is_valid_priority(*score))
            .fold(None, |best: Option<f64>, score| Some(best.map_or(score, |b| b.max(score))));
        match best {
            None => prop_assert!(result.unwrap_err().is_no_opener()),
            Some(best) => {
                let expected = scores.iter().position(|score| *score == best).unwrap();
                let expected_id = format!("h{expected}");
                let winner = result.unwrap();
                prop_assert_eq!(winner.handler_id(), expected_id.as_str());
            }
        }
    }

    /// Property: adding then disposing a handler leaves the ranking untouched
    #[test]
    fn add_then_dispose_is_transparent(scores in score_set_strategy(), extra in score_strategy()) {
        let handlers: Vec<Arc<MockHandler>> = scores
            .iter()
            .enumerate()
            .map(|(i, score)| MockHandler::scoring(&format!("h{i}"), *score))
            .collect();
        let refs: Vec<&Arc<MockHandler>> = handlers.iter().collect();
        let service = OpenerService::new(Arc::new(StaticContributionProvider::from_instances(
            as_handlers(&refs),
        )));
        let uri = Uri::new("file:///prop");

        let before = handler_ids(&tokio_test::block_on(service.get_openers(Some(&uri), None)));
        let registration = service.add_handler(MockHandler::scoring("extra", extra));
        registration.dispose();
        let after = handler_ids(&tokio_test::block_on(service.get_openers(Some(&uri), None)));

        prop_assert_eq!(before, after);
    }
}

#[test]
fn test_open_handler_capability_name() {
    assert_eq!(OPEN_HANDLER.name(), "OpenHandler");
}
