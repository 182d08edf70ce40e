//! Live GNN risk feed for the Decision Engine.

use log::{debug, error};
use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// Weight of the GNN confidence in the combined risk; the TCN gets the rest.
const GNN_WEIGHT: f64 = 0.6;

/// Why a poll of the risk endpoint produced nothing usable.
#[derive(Debug, Error)]
pub enum RiskFeedError {
	/// Fetch could not be issued or the body could not be read.
	#[error("risk request failed: {0}")]
	Network(String),
	/// Non-2xx status.
	#[error("risk endpoint returned HTTP {0}")]
	Http(u16),
	/// Body is not the expected JSON.
	#[error("malformed risk payload: {0}")]
	Decode(#[from] serde_json::Error),
	/// Service answered with a non-success status.
	#[error("risk service reported an error: {0}")]
	Upstream(String),
	/// Success reply without a required field.
	#[error("risk payload is missing `{0}`")]
	MissingField(&'static str),
}

/// Qualitative breakdown in a successful reply.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RiskDetails {
	/// Strength of the relationship network.
	pub relational_stability: String,
	/// Exposure to spending volatility.
	pub volatility_exposure: String,
}

/// Body of `GET /predict-risk`. Error replies carry only `status` and `message`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RiskResponse {
	/// `success` or `error`.
	pub status: String,
	/// Model risk in 0..=1.
	#[serde(default)]
	pub risk_score: Option<f64>,
	/// GNN confidence in 0..=1.
	#[serde(default)]
	pub confidence: Option<f64>,
	/// Present on success.
	#[serde(default)]
	pub details: Option<RiskDetails>,
	/// Present on error.
	#[serde(default)]
	pub message: Option<String>,
}

impl RiskResponse {
	/// Decode a response body.
	pub fn parse(body: &str) -> Result<Self, RiskFeedError> {
		Ok(serde_json::from_str(body)?)
	}

	/// True when `status` is `success`.
	pub fn is_success(&self) -> bool {
		self.status == "success"
	}
}

/// GNN card values.
#[derive(Clone, Debug, PartialEq)]
pub struct GnnMetrics {
	/// Confidence shown as the GNN score.
	pub score: f64,
	/// `Strong` above 0.7, else `Moderate`.
	pub status: String,
	/// Network density label.
	pub network_density: String,
	/// Relationship strength label.
	pub relationship_strength: String,
	/// Volatility exposure label.
	pub volatility_exposure: String,
}

impl Default for GnnMetrics {
	fn default() -> Self {
		Self {
			score: 0.84,
			status: "Strong".into(),
			network_density: "Medium".into(),
			relationship_strength: "High".into(),
			volatility_exposure: "Low".into(),
		}
	}
}

/// Round to two decimals.
pub fn round2(v: f64) -> f64 {
	(v * 100.0).round() / 100.0
}

/// One minus the weighted GNN/TCN confidence.
pub fn combined_risk(gnn_confidence: f64, tcn_score: f64) -> f64 {
	round2(1.0 - (gnn_confidence * GNN_WEIGHT + tcn_score * (1.0 - GNN_WEIGHT)))
}

/// Values shown on the Decision Engine; starts from the demo defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct RiskBoard {
	/// Latest GNN card values.
	pub gnn: GnnMetrics,
	/// Weighted risk shown in the ring.
	pub combined_risk: f64,
}

impl Default for RiskBoard {
	fn default() -> Self {
		Self {
			gnn: GnnMetrics::default(),
			combined_risk: 0.28,
		}
	}
}

impl RiskBoard {
	/// Fold a successful reply into the board. Nothing changes on error.
	pub fn apply(&mut self, resp: &RiskResponse, tcn_score: f64) -> Result<(), RiskFeedError> {
		if !resp.is_success() {
			return Err(RiskFeedError::Upstream(
				resp.message.clone().unwrap_or_else(|| resp.status.clone()),
			));
		}
		let confidence = resp
			.confidence
			.filter(|c| c.is_finite())
			.ok_or(RiskFeedError::MissingField("confidence"))?;
		let details = resp
			.details
			.as_ref()
			.ok_or(RiskFeedError::MissingField("details"))?;

		self.gnn = GnnMetrics {
			score: confidence,
			status: if confidence > 0.7 { "Strong" } else { "Moderate" }.into(),
			network_density: "Medium".into(),
			relationship_strength: details.relational_stability.clone(),
			volatility_exposure: details.volatility_exposure.clone(),
		};
		self.combined_risk = combined_risk(confidence, tcn_score);
		Ok(())
	}

	/// Apply a poll outcome, logging and swallowing any failure.
	/// Returns whether the board changed.
	pub fn record(&mut self, outcome: Result<RiskResponse, RiskFeedError>, tcn_score: f64) -> bool {
		match outcome.and_then(|resp| self.apply(&resp, tcn_score)) {
			Ok(()) => {
				debug!(
					"risk feed: gnn {} combined {}",
					self.gnn.score, self.combined_risk
				);
				true
			}
			Err(e) => {
				error!("Failed to fetch AI risk score: {e}");
				false
			}
		}
	}
}

fn js_error(v: JsValue) -> RiskFeedError {
	RiskFeedError::Network(
		v.as_string()
			.unwrap_or_else(|| format!("{v:?}")),
	)
}

/// One GET against the risk endpoint.
pub async fn fetch_risk(endpoint: &str) -> Result<RiskResponse, RiskFeedError> {
	let window = web_sys::window().ok_or_else(|| RiskFeedError::Network("no window".into()))?;

	let opts = RequestInit::new();
	opts.set_method("GET");
	opts.set_mode(RequestMode::Cors);
	let request = Request::new_with_str_and_init(endpoint, &opts).map_err(js_error)?;

	let resp: Response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(js_error)?
		.dyn_into()
		.map_err(js_error)?;
	if !resp.ok() {
		return Err(RiskFeedError::Http(resp.status()));
	}

	let text = JsFuture::from(resp.text().map_err(js_error)?)
		.await
		.map_err(js_error)?;
	let body = text
		.as_string()
		.ok_or_else(|| RiskFeedError::Network("response body is not text".into()))?;
	RiskResponse::parse(&body)
}

#[cfg(test)]
mod tests {
	use super::*;

	const TCN: f64 = 0.79;

	const SUCCESS: &str = r#"{
		"status": "success",
		"risk_score": 0.09,
		"confidence": 0.91,
		"details": {"relational_stability": "High", "volatility_exposure": "Low"}
	}"#;

	#[test]
	fn success_updates_board() {
		let mut board = RiskBoard::default();
		let resp = RiskResponse::parse(SUCCESS).unwrap();
		board.apply(&resp, TCN).unwrap();
		assert_eq!(board.gnn.score, 0.91);
		assert_eq!(board.gnn.status, "Strong");
		assert_eq!(board.gnn.network_density, "Medium");
		assert_eq!(board.combined_risk, 0.14);
	}

	#[test]
	fn low_confidence_is_moderate() {
		let mut board = RiskBoard::default();
		let resp = RiskResponse::parse(
			r#"{"status":"success","risk_score":0.4,"confidence":0.6,
			"details":{"relational_stability":"Moderate","volatility_exposure":"High"}}"#,
		)
		.unwrap();
		board.apply(&resp, TCN).unwrap();
		assert_eq!(board.gnn.status, "Moderate");
		assert_eq!(board.gnn.volatility_exposure, "High");
		assert_eq!(board.combined_risk, 0.32);
	}

	#[test]
	fn combined_risk_rounds_to_cents() {
		assert_eq!(combined_risk(0.84, TCN), 0.18);
		assert_eq!(combined_risk(1.0, 1.0), 0.0);
	}

	#[test]
	fn error_status_leaves_board_unchanged() {
		let mut board = RiskBoard::default();
		let resp = RiskResponse::parse(r#"{"status":"error","message":"model not loaded"}"#).unwrap();
		let err = board.apply(&resp, TCN).unwrap_err();
		assert!(matches!(err, RiskFeedError::Upstream(ref m) if m == "model not loaded"));
		assert_eq!(board, RiskBoard::default());
	}

	#[test]
	fn missing_fields_are_reported() {
		let mut board = RiskBoard::default();
		let resp = RiskResponse::parse(r#"{"status":"success"}"#).unwrap();
		assert!(matches!(
			board.apply(&resp, TCN),
			Err(RiskFeedError::MissingField("confidence"))
		));
		let resp = RiskResponse::parse(r#"{"status":"success","confidence":0.9}"#).unwrap();
		assert!(matches!(
			board.apply(&resp, TCN),
			Err(RiskFeedError::MissingField("details"))
		));
		assert_eq!(board, RiskBoard::default());
	}

	#[test]
	fn failed_poll_is_swallowed() {
		let mut board = RiskBoard::default();
		assert!(!board.record(Err(RiskFeedError::Network("refused".into())), TCN));
		assert!(!board.record(RiskResponse::parse("<html>"), TCN));
		assert_eq!(board.gnn.score, 0.84);
		assert_eq!(board.combined_risk, 0.28);

		assert!(board.record(RiskResponse::parse(SUCCESS), TCN));
		assert_eq!(board.gnn.score, 0.91);
	}
}
