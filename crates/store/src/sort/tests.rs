use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::id::story_id;
use crate::parameters::Parameters;

fn views(entries: &[(&str, &str)]) -> Vec<StoryView> {
	entries
		.iter()
		.map(|&(kind, name)| StoryView {
			id: story_id(kind, name),
			kind: kind.to_string(),
			name: name.to_string(),
			parameters: Arc::new(Parameters::new()),
		})
		.collect()
}

fn ids(stories: &[StoryView]) -> Vec<&str> {
	stories.iter().map(|s| s.id.as_str()).collect()
}

fn policy(config: Value) -> StorySort {
	StorySort::from_value(&config).expect("valid sort config")
}

#[test]
fn no_policy_keeps_insertion_order() {
	let stories = views(&[("c", "1"), ("a", "2"), ("b", "1"), ("a", "1")]);
	assert_eq!(
		ids(&sort_stories(stories, None)),
		["c--1", "a--2", "b--1", "a--1"]
	);
}

#[test]
fn custom_comparator_is_stable() {
	let stories = views(&[("a", "1"), ("a", "2"), ("b", "1")]);
	let reverse_kind = StorySort::custom(|a, b| b.kind.cmp(&a.kind));

	assert_eq!(ids(&reverse_kind.apply(stories)), ["b--1", "a--1", "a--2"]);
}

#[test]
fn custom_comparator_runs_over_the_flat_list() {
	let stories = views(&[("a", "z"), ("b", "y"), ("a", "x")]);
	let by_name = StorySort::custom(|a, b| a.name.cmp(&b.name));

	assert_eq!(ids(&by_name.apply(stories)), ["a--x", "b--y", "a--z"]);
}

#[test]
fn alphabetical_groups_by_path_and_compares_numerically() {
	let stories = views(&[
		("a/b", "1"),
		("a/a", "2"),
		("a/a", "1"),
		("c", "1"),
		("b/b10", "1"),
		("b/b9", "1"),
		("b/b1", "1"),
	]);

	assert_eq!(
		ids(&policy(json!({"method": "alphabetical"})).apply(stories)),
		[
			"a-a--2", "a-a--1", "a-b--1", "b-b1--1", "b-b9--1", "b-b10--1", "c--1"
		]
	);
}

#[test]
fn alphabetical_with_explicit_order_puts_listed_groups_first() {
	let stories = views(&[
		("a/b", "1"),
		("a/a", "1"),
		("b/x", "1"),
		("c", "1"),
		("b/a", "1"),
		("d", "1"),
	]);

	let sorted = policy(json!({"method": "alphabetical", "order": ["c", "b", ["x"]]})).apply(stories);

	assert_eq!(
		ids(&sorted),
		["c--1", "b-x--1", "b-a--1", "a-a--1", "a-b--1", "d--1"]
	);
}

#[test]
fn wildcard_places_unlisted_groups() {
	let stories = views(&[("z", "1"), ("a", "1"), ("last", "1"), ("first", "1"), ("m", "1")]);

	let sorted = policy(json!({"method": "alphabetical", "order": ["first", "*", "last"]})).apply(stories);

	assert_eq!(ids(&sorted), ["first--1", "a--1", "m--1", "z--1", "last--1"]);
}

#[test]
fn configure_keeps_unlisted_children_in_insertion_order() {
	let stories = views(&[
		("a", "1"),
		("b/z", "1"),
		("c", "1"),
		("b/m", "1"),
		("b/a", "1"),
	]);

	let sorted = policy(json!({"method": "configure", "order": ["b", "a", "c"]})).apply(stories);

	assert_eq!(ids(&sorted), ["b-z--1", "b-m--1", "b-a--1", "a--1", "c--1"]);
}

#[test]
fn configure_applies_nested_order() {
	let stories = views(&[("b/z", "1"), ("b/m", "1"), ("b/a", "1"), ("a", "1")]);

	let sorted = policy(json!({"order": ["b", ["a", "z"], "a"]})).apply(stories);

	assert_eq!(ids(&sorted), ["b-a--1", "b-z--1", "b-m--1", "a--1"]);
}

#[test]
fn nested_order_after_wildcard_applies_to_unlisted_groups() {
	let stories = views(&[("q/z", "1"), ("q/a", "1"), ("first", "1"), ("r/m", "1"), ("r/z", "1")]);

	let sorted = policy(json!({"method": "configure", "order": ["first", "*", ["a", "z"]]})).apply(stories);

	assert_eq!(
		ids(&sorted),
		["first--1", "q-a--1", "q-z--1", "r-z--1", "r-m--1"]
	);
}

#[test]
fn configure_without_order_is_first_appearance_of_groups() {
	let stories = views(&[("b/y", "1"), ("a", "1"), ("b/x", "1"), ("a", "2"), ("b/y", "2")]);

	assert_eq!(
		ids(&StorySort::configure().apply(stories)),
		["b-y--1", "b-y--2", "b-x--1", "a--1", "a--2"]
	);
}

#[test]
fn empty_order_behaves_like_no_order() {
	let stories = views(&[("b", "1"), ("a", "1")]);
	let with_empty = policy(json!({"method": "alphabetical", "order": []})).apply(stories.clone());
	let without = StorySort::alphabetical().apply(stories);
	assert_eq!(ids(&with_empty), ids(&without));
	assert_eq!(ids(&with_empty), ["a--1", "b--1"]);
}

#[test]
fn exact_kind_sorts_as_leaf_before_deeper_paths() {
	let stories = views(&[("a/deep", "1"), ("b", "1"), ("a", "1")]);

	let sorted = policy(json!({"method": "configure", "order": ["a", "b"]})).apply(stories);

	assert_eq!(ids(&sorted), ["a--1", "a-deep--1", "b--1"]);
}

#[test]
fn whitespace_around_separators_is_ignored() {
	let stories = views(&[("b / x", "1"), ("a", "1"), ("b/y", "1")]);

	let sorted = StorySort::alphabetical().apply(stories);

	assert_eq!(ids(&sorted), ["a--1", "b-x--1", "b-y--1"]);
}

#[test]
fn group_named_like_the_wildcard_is_unlisted() {
	let stories = views(&[("*", "1"), ("a", "1"), ("b", "1")]);

	let sorted = policy(json!({"method": "configure", "order": ["b", "*"]})).apply(stories);

	assert_eq!(ids(&sorted), ["b--1", "--1", "a--1"]);
}

#[test]
fn malformed_configs_are_rejected() {
	for config in [
		json!("alphabetical"),
		json!({"method": "random"}),
		json!({"method": 3}),
		json!({"order": "a"}),
		json!({"order": [["a"]]}),
	] {
		assert!(
			matches!(StorySort::from_value(&config), Err(StoreError::InvalidSortConfig(_))),
			"{config} should be rejected"
		);
	}
}

#[test]
fn kind_prefix_matches_whole_segments() {
	assert!(kind_has_prefix("a", "a"));
	assert!(kind_has_prefix("a/b/c", "a/b"));
	assert!(kind_has_prefix("a / b", "a/b"));
	assert!(!kind_has_prefix("ab", "a"));
	assert!(!kind_has_prefix("a", "a/b"));
}
