//! Per-request page metrics.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use shop_core::RequestId;

/// Metrics for a single storefront request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMetrics {
    /// Request ID for correlation.
    pub request_id: String,
    /// Route path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Page store outcome (HIT, MISS, STALE, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_status: Option<String>,
    /// Page generation passes run during this request.
    pub generations: Vec<GenerationMetrics>,
    /// Checkout attempts made during this request.
    pub checkouts: Vec<CheckoutMetrics>,
    /// Total request duration (microseconds).
    pub total_duration_us: u64,
    /// HTTP status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Metrics for one page generation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetrics {
    /// Page key that was generated.
    pub page: String,
    /// Duration of the pass (microseconds).
    pub duration_us: u64,
    /// Whether the pass produced a page.
    pub success: bool,
    /// Error message if the pass failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Metrics for one checkout attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutMetrics {
    /// Price the session was requested for.
    pub price_id: String,
    /// Round-trip time to the checkout endpoint (microseconds).
    pub duration_us: u64,
    /// Whether the browser was redirected.
    pub redirected: bool,
}

/// Collector for request metrics.
#[derive(Debug)]
pub struct MetricsCollector {
    request_id: RequestId,
    route: Option<String>,
    start: Instant,
    cache_status: Option<String>,
    generations: Vec<GenerationMetrics>,
    checkouts: Vec<CheckoutMetrics>,
}

impl MetricsCollector {
    /// Create a new metrics collector.
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            route: None,
            start: Instant::now(),
            cache_status: None,
            generations: Vec::new(),
            checkouts: Vec::new(),
        }
    }

    /// Set route path.
    pub fn set_route(&mut self, route: impl Into<String>) {
        self.route = Some(route.into());
    }

    /// Record the page store outcome.
    pub fn set_cache_status(&mut self, status: impl Into<String>) {
        self.cache_status = Some(status.into());
    }

    /// Record a generation pass.
    pub fn record_generation(&mut self, page: &str, duration: Duration, error: Option<String>) {
        self.generations.push(GenerationMetrics {
            page: page.to_string(),
            duration_us: duration.as_micros() as u64,
            success: error.is_none(),
            error,
        });
    }

    /// Record a checkout attempt.
    pub fn record_checkout(&mut self, price_id: &str, duration: Duration, redirected: bool) {
        self.checkouts.push(CheckoutMetrics {
            price_id: price_id.to_string(),
            duration_us: duration.as_micros() as u64,
            redirected,
        });
    }

    /// Get total elapsed time.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Finalize and return the metrics.
    pub fn finalize(self, status_code: Option<u16>) -> RequestMetrics {
        RequestMetrics {
            request_id: self.request_id.to_string(),
            route: self.route,
            cache_status: self.cache_status,
            generations: self.generations,
            checkouts: self.checkouts,
            total_duration_us: self.start.elapsed().as_micros() as u64,
            status_code,
        }
    }
}

impl RequestMetrics {
    /// Format as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Format as human-readable summary.
    pub fn to_summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Request: {} {} [{}]",
            self.request_id,
            self.route.as_deref().unwrap_or("-"),
            self.status_code.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string())
        ));

        if let Some(status) = &self.cache_status {
            lines.push(format!("  Page store: {}", status));
        }

        for generation in &self.generations {
            let outcome = if generation.success { "ok" } else { "FAILED" };
            lines.push(format!(
                "  Generated {}: {:.2}ms ({})",
                generation.page,
                generation.duration_us as f64 / 1000.0,
                outcome
            ));
        }

        for checkout in &self.checkouts {
            let outcome = if checkout.redirected { "redirected" } else { "failed" };
            lines.push(format!(
                "  Checkout {}: {:.2}ms ({})",
                checkout.price_id,
                checkout.duration_us as f64 / 1000.0,
                outcome
            ));
        }

        lines.push(format!(
            "  Total: {:.2}ms",
            self.total_duration_us as f64 / 1000.0
        ));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_collects_generations_and_checkouts() {
        let mut collector = MetricsCollector::new(RequestId::from_string("req-9"));
        collector.set_route("/product/prod_1");
        collector.set_cache_status("MISS");
        collector.record_generation("page:/product/prod_1", Duration::from_millis(12), None);
        collector.record_generation(
            "page:/",
            Duration::from_millis(3),
            Some("commerce api unavailable".to_string()),
        );
        collector.record_checkout("price_123", Duration::from_millis(40), true);

        let metrics = collector.finalize(Some(200));
        assert_eq!(metrics.generations.len(), 2);
        assert!(metrics.generations[0].success);
        assert!(!metrics.generations[1].success);
        assert_eq!(metrics.checkouts[0].price_id, "price_123");

        let summary = metrics.to_summary();
        assert!(summary.contains("Request: req-9 /product/prod_1 [200]"));
        assert!(summary.contains("Page store: MISS"));
        assert!(summary.contains("(FAILED)"));
        assert!(summary.contains("(redirected)"));
    }

    #[test]
    fn test_json_skips_missing_fields() {
        let metrics = MetricsCollector::new(RequestId::from_string("req-1")).finalize(None);
        let json: serde_json::Value = serde_json::from_str(&metrics.to_json()).unwrap();
        assert!(json.get("route").is_none());
        assert!(json.get("status_code").is_none());
        assert_eq!(json["request_id"], "req-1");
    }
}
