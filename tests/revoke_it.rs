// self
use bearer_broker::{
	_preludet::*,
	endpoint::{RevocationRequest, TokenRequest},
	store::CredentialStore,
};

async fn issue_token(stack: &TestStack) -> String {
	let response = stack
		.token_endpoint
		.token(
			&TokenRequest::new("password")
				.with_field("username", "user@example.com")
				.with_field("password", "correct-horse"),
		)
		.await;

	assert_eq!(response.status, 200);

	response
		.body
		.and_then(|body| body.get("access_token").and_then(|token| token.as_str().map(String::from)))
		.expect("Granted responses should carry an access token.")
}

#[tokio::test]
async fn revoking_a_live_token_rotates_it() {
	let stack = build_test_stack([]);

	seed_login(&stack.store, "user@example.com", "correct-horse").await;

	let token = issue_token(&stack).await;
	let response = stack.revocation_endpoint.revoke(&RevocationRequest::access_token(&token)).await;

	assert_eq!(response.status, 200);
	assert!(response.body.is_none());
	assert!(
		stack
			.store
			.find_by_token(&token)
			.await
			.expect("Stale-token lookup should succeed.")
			.is_none(),
		"The presented token must be dead after revocation.",
	);

	let record = stack
		.store
		.find_by_identification("user@example.com")
		.await
		.expect("Store lookup should succeed.")
		.expect("The seeded login should remain present.");

	assert_ne!(
		record.token.as_ref().map(|held| held.expose()),
		Some(token.as_str()),
		"The record's token value must differ before vs. after the call.",
	);
}

#[tokio::test]
async fn revoking_an_unknown_token_is_a_uniform_no_op() {
	let stack = build_test_stack([]);

	seed_login(&stack.store, "user@example.com", "correct-horse").await;

	let live = issue_token(&stack).await;
	let response =
		stack.revocation_endpoint.revoke(&RevocationRequest::access_token("badtoken")).await;

	assert_eq!(response.status, 200);
	assert!(response.body.is_none());

	let record = stack
		.store
		.find_by_identification("user@example.com")
		.await
		.expect("Store lookup should succeed.")
		.expect("The seeded login should remain present.");

	assert_eq!(
		record.token.as_ref().map(|held| held.expose()),
		Some(live.as_str()),
		"Revoking an unknown token must not alter any record.",
	);
}

#[tokio::test]
async fn revoking_twice_is_still_acknowledged() {
	let stack = build_test_stack([]);

	seed_login(&stack.store, "user@example.com", "correct-horse").await;

	let token = issue_token(&stack).await;
	let request = RevocationRequest::access_token(&token);
	let first = stack.revocation_endpoint.revoke(&request).await;
	let second = stack.revocation_endpoint.revoke(&request).await;

	assert_eq!(first.status, 200);
	assert_eq!(second.status, 200, "Re-revoking an already-dead token stays a 200 no-op.");

	let after_first = stack
		.store
		.find_by_identification("user@example.com")
		.await
		.expect("Store lookup should succeed.")
		.expect("The seeded login should remain present.")
		.token;
	let _ = stack.revocation_endpoint.revoke(&request).await;
	let after_second = stack
		.store
		.find_by_identification("user@example.com")
		.await
		.expect("Store lookup should succeed.")
		.expect("The seeded login should remain present.")
		.token;

	assert_eq!(
		after_first.map(|held| held.expose().to_owned()),
		after_second.map(|held| held.expose().to_owned()),
		"A dead token must not trigger further rotation.",
	);
}

#[tokio::test]
async fn the_hint_is_accepted_but_never_branched_on() {
	let stack = build_test_stack([]);

	seed_login(&stack.store, "user@example.com", "correct-horse").await;

	let token = issue_token(&stack).await;
	let response = stack
		.revocation_endpoint
		.revoke(&RevocationRequest { token_type_hint: None, token: token.clone() })
		.await;

	assert_eq!(response.status, 200);
	assert!(
		stack
			.store
			.find_by_token(&token)
			.await
			.expect("Stale-token lookup should succeed.")
			.is_none(),
		"Revocation must work identically without a hint.",
	);
}
