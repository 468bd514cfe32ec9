// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::HandleConnectionError;
use crate::availability::AvailabilityChecker;
use crate::sign_up::{CheckOutcome, SignUpSession};
use crate::websocket_msg::{recv_json, WebSocketRecvError};
use async_std::channel::{unbounded, Receiver};
use async_std::sync::Arc;
use futures::{select, FutureExt};
use sopt_stamp_shared::messages::sign_up::{SignUpEvent, SignUpUpdate};
use std::time::Duration;
use tide_websockets::WebSocketConnection;

/// Runs one sign-up session over the WebSocket connection
pub async fn handle_connection(
	mut stream: WebSocketConnection,
	checker: Arc<dyn AvailabilityChecker>,
	check_timeout: Duration,
) -> tide::Result<()> {
	let (outcome_tx, outcome_rx) = unbounded::<CheckOutcome>();
	let mut session = SignUpSession::new(checker, check_timeout, outcome_tx);

	stream
		.send_json(&SignUpUpdate::Submittable(session.form_state().submittable))
		.await?;

	let result = loop {
		if let Err(error) = process_message(&mut stream, &mut session, &outcome_rx).await {
			break error;
		}
	};
	session.close();

	match result {
		HandleConnectionError::SendError(error) => Err(error),
		HandleConnectionError::ConnectionClosed => Ok(()),
	}
}

/// Waits for either a client event or a finished availability check, applies it to the session, and sends the
/// resulting updates. Only one of the two is applied per call, so the session sees events one at a time.
async fn process_message(
	stream: &mut WebSocketConnection,
	session: &mut SignUpSession,
	outcome_rx: &Receiver<CheckOutcome>,
) -> Result<(), HandleConnectionError> {
	let updates = {
		let mut outcome_future = Box::pin(outcome_rx.recv().fuse());
		let mut recv_event_future = Box::pin(recv_json::<SignUpEvent>(stream).fuse());
		select! {
			outcome = outcome_future => match outcome {
				Ok(outcome) => session.resolve_check(outcome),
				// The session holds a sender, so this doesn't happen while it's alive
				Err(_) => Vec::new(),
			},
			recv_event_result = recv_event_future => process_incoming_event(recv_event_result, session).await?
		}
	};

	for update in updates {
		stream.send_json(&update).await?;
	}
	Ok(())
}

async fn process_incoming_event(
	recv_event_result: Result<SignUpEvent, WebSocketRecvError>,
	session: &mut SignUpSession,
) -> Result<Vec<SignUpUpdate>, HandleConnectionError> {
	match recv_event_result {
		Ok(event) => Ok(session.handle_event(event).await),
		Err(error) => {
			error.log();
			Err(HandleConnectionError::ConnectionClosed)
		}
	}
}

#[cfg(test)]
mod tests {
	use crate::availability::{AvailabilityChecker, CheckError, DirectoryChecker};
	use crate::data_sync::add_routes;
	use crate::directory::UserDirectory;
	use async_std::future::timeout;
	use async_std::net::TcpListener;
	use async_std::sync::Arc;
	use async_std::task;
	use async_trait::async_trait;
	use async_tungstenite::async_std::connect_async;
	use async_tungstenite::tungstenite::{Error as WsError, Message};
	use futures::future::pending;
	use futures::{Sink, SinkExt, Stream, StreamExt};
	use sopt_stamp_shared::messages::sign_up::{SignUpEvent, SignUpRequest, SignUpResponse, SignUpUpdate};
	use sopt_stamp_shared::validation::{ValidationField, ValidationVerdict, VALID_NICKNAME_MESSAGE};
	use std::fmt::Debug;
	use std::sync::atomic::{AtomicBool, Ordering};
	use std::time::Duration;

	const FRAME_WAIT: Duration = Duration::from_secs(5);

	async fn serve(checker: Arc<dyn AvailabilityChecker>, check_timeout: Duration) -> String {
		let mut app = tide::new();
		add_routes(&mut app, checker, check_timeout);

		let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
		let port = listener.local_addr().unwrap().port();
		task::spawn(async move { app.listen(listener).await });

		format!("ws://127.0.0.1:{}/ws", port)
	}

	async fn send_event<S>(ws: &mut S, event: &SignUpEvent)
	where
		S: Sink<Message> + Unpin,
		S::Error: Debug,
	{
		let json = serde_json::to_string(event).unwrap();
		ws.send(Message::Text(json)).await.unwrap();
	}

	async fn next_update<S>(ws: &mut S) -> SignUpUpdate
	where
		S: Stream<Item = Result<Message, WsError>> + Unpin,
	{
		loop {
			let message = timeout(FRAME_WAIT, ws.next())
				.await
				.expect("no frame arrived in time")
				.expect("connection ended")
				.unwrap();
			if let Message::Text(text) = message {
				return serde_json::from_str(&text).unwrap();
			}
		}
	}

	async fn next_updates<S>(ws: &mut S, count: usize) -> Vec<SignUpUpdate>
	where
		S: Stream<Item = Result<Message, WsError>> + Unpin,
	{
		let mut updates = Vec::with_capacity(count);
		for _ in 0..count {
			updates.push(next_update(ws).await);
		}
		updates
	}

	fn verdict(field: ValidationField, verdict: ValidationVerdict) -> SignUpUpdate {
		SignUpUpdate::FieldVerdict { field, verdict }
	}

	#[async_std::test]
	async fn session_runs_from_first_frame_to_registration() {
		let directory = Arc::new(UserDirectory::with_fast_hashing());
		let checker = Arc::new(DirectoryChecker::new(Arc::clone(&directory)));
		let url = serve(checker, FRAME_WAIT).await;
		let (mut ws, _) = connect_async(url.as_str()).await.unwrap();

		assert_eq!(next_update(&mut ws).await, SignUpUpdate::Submittable(false));

		// The edit's own updates arrive before the check outcome is applied
		send_event(&mut ws, &SignUpEvent::EditNickname(String::from("Alice"))).await;
		assert_eq!(
			next_updates(&mut ws, 4).await,
			vec![
				verdict(ValidationField::Nickname, ValidationVerdict::valid("")),
				SignUpUpdate::Submittable(false),
				verdict(ValidationField::Nickname, ValidationVerdict::valid(VALID_NICKNAME_MESSAGE)),
				SignUpUpdate::Submittable(false),
			]
		);

		send_event(&mut ws, &SignUpEvent::EditEmail(String::from("a@b.com"))).await;
		let updates = next_updates(&mut ws, 4).await;
		assert_eq!(
			updates[2..],
			[verdict(ValidationField::Email, ValidationVerdict::valid("")), SignUpUpdate::Submittable(false)]
		);

		send_event(&mut ws, &SignUpEvent::EditPassword(String::from("abc12345!"))).await;
		next_updates(&mut ws, 2).await;
		send_event(&mut ws, &SignUpEvent::EditPasswordConfirm(String::from("abc12345!"))).await;
		assert_eq!(next_updates(&mut ws, 2).await[1], SignUpUpdate::Submittable(true));

		send_event(&mut ws, &SignUpEvent::Submit).await;
		let SignUpUpdate::SignUpResult(Ok(SignUpResponse::Success(user))) = next_update(&mut ws).await else {
			panic!("sign-up did not succeed");
		};
		assert_eq!(user.email, "a@b.com");
		assert!(!directory.email_available("a@b.com").await);
	}

	#[async_std::test]
	async fn invalid_message_ends_the_connection() {
		let checker = Arc::new(DirectoryChecker::new(Arc::new(UserDirectory::with_fast_hashing())));
		let url = serve(checker, FRAME_WAIT).await;
		let (mut ws, _) = connect_async(url.as_str()).await.unwrap();
		next_update(&mut ws).await;

		ws.send(Message::Text(String::from("not json"))).await.unwrap();
		let ended = timeout(FRAME_WAIT, async {
			loop {
				match ws.next().await {
					None | Some(Err(_)) | Some(Ok(Message::Close(_))) => break,
					Some(Ok(_)) => continue,
				}
			}
		})
		.await;
		assert!(ended.is_ok());
	}

	struct SetOnDrop(Arc<AtomicBool>);

	impl Drop for SetOnDrop {
		fn drop(&mut self) {
			self.0.store(true, Ordering::SeqCst);
		}
	}

	/// Never answers, and records when a check starts and when it's dropped
	#[derive(Default)]
	struct HangingChecker {
		started: Arc<AtomicBool>,
		abandoned: Arc<AtomicBool>,
	}

	#[async_trait]
	impl AvailabilityChecker for HangingChecker {
		async fn check_nickname_available(&self, _nickname: &str) -> Result<bool, CheckError> {
			let _abandoned = SetOnDrop(Arc::clone(&self.abandoned));
			self.started.store(true, Ordering::SeqCst);
			pending().await
		}

		async fn check_email_available(&self, _email: &str) -> Result<bool, CheckError> {
			pending().await
		}

		async fn submit_sign_up(&self, _request: &SignUpRequest) -> Result<SignUpResponse, CheckError> {
			pending().await
		}
	}

	async fn wait_for(flag: &AtomicBool) -> bool {
		for _ in 0..100 {
			if flag.load(Ordering::SeqCst) {
				return true;
			}
			task::sleep(Duration::from_millis(20)).await;
		}
		false
	}

	#[async_std::test]
	async fn closing_the_socket_aborts_outstanding_checks() {
		let checker = Arc::new(HangingChecker::default());
		let started = Arc::clone(&checker.started);
		let abandoned = Arc::clone(&checker.abandoned);
		// Long enough that only the abort can end the check within the test
		let url = serve(checker, Duration::from_secs(600)).await;
		let (mut ws, _) = connect_async(url.as_str()).await.unwrap();
		next_update(&mut ws).await;

		send_event(&mut ws, &SignUpEvent::EditNickname(String::from("Alice"))).await;
		next_updates(&mut ws, 2).await;
		assert!(wait_for(&started).await);
		assert!(!abandoned.load(Ordering::SeqCst));

		ws.close(None).await.unwrap();
		assert!(wait_for(&abandoned).await);
	}
}
