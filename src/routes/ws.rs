//! WebSocket upgrade + message loop. Each connection owns one player session,
//! created on connect and discarded on disconnect. We reply with a single
//! JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};
use uuid::Uuid;

use crate::error::AppError;
use crate::logic::{self, HintResult};
use crate::protocol::{ClientWsMessage, HintOut, ServerWsMessage, SubmitOut, TIME_UP_MESSAGE};
use crate::session::Tick;
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "debug_challenge", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  let session_id = logic::create_session(&state).await.session_id;
  info!(target: "debug_challenge", session = %session_id, "WebSocket connected");

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "debug_challenge", session = %session_id, bytes = txt.len(), "WS message received");
            handle_client_ws(incoming, &state, session_id).await
              .unwrap_or_else(|e| ServerWsMessage::Error { message: e.to_string() })
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "debug_challenge", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }

  let _ = logic::end_session(&state, session_id).await;
  info!(target: "debug_challenge", session = %session_id, "WebSocket disconnected");
}

#[instrument(level = "info", skip(msg, state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState, session_id: Uuid) -> Result<ServerWsMessage, AppError> {
  Ok(match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Start => {
      let session = logic::start_challenge(state, session_id).await?;
      info!(target: "challenge", session = %session_id, "WS challenge served");
      ServerWsMessage::Challenge { session }
    }

    ClientWsMessage::Tick => match logic::tick(state, session_id).await? {
      (Tick::Remaining(r), _) => ServerWsMessage::Timer { remaining: r.to_string(), remaining_secs: r.secs },
      (Tick::TimeUp, _) => ServerWsMessage::TimeUp { message: TIME_UP_MESSAGE.into() },
      (Tick::Idle(_), _) => ServerWsMessage::State { session: logic::session_view(state, session_id).await? },
    },

    ClientWsMessage::Submit { code } => {
      let (outcome, phase) = logic::submit_solution(state, session_id, &code).await?;
      info!(target: "challenge", session = %session_id, ?outcome, "WS submission judged");
      ServerWsMessage::SubmitResult(SubmitOut::new(outcome, phase))
    }

    ClientWsMessage::Hint { message } => {
      let (result, phase) = logic::request_hint(state, session_id, &message).await?;
      if result == HintResult::TimeUp {
        ServerWsMessage::TimeUp { message: TIME_UP_MESSAGE.into() }
      } else {
        ServerWsMessage::HintReply(HintOut::new(result, phase))
      }
    }

    ClientWsMessage::State => ServerWsMessage::State { session: logic::session_view(state, session_id).await? },
  })
}
