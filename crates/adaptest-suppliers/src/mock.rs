//! Mock supplier for testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use adaptest_core::model::Question;
use adaptest_core::traits::{QuestionSupplier, SupplyRequest, SupplyResponse};

/// A mock question supplier for testing session wiring without real API
/// calls. Returns fixed collections and records the requests it receives.
pub struct MockSupplier {
    main: Vec<Question>,
    buffer: Vec<Question>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<SupplyRequest>>,
}

impl MockSupplier {
    /// Create a mock that always delivers the given collections.
    pub fn with_collections(main: Vec<Question>, buffer: Vec<Question>) -> Self {
        Self {
            main,
            buffer,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock delivering generated placeholder questions: `main_count`
    /// evenly spaced over 0.3–0.7 and `buffer_count` evenly over 0.1–0.9.
    pub fn with_generated(main_count: usize, buffer_count: usize) -> Self {
        let main = (0..main_count)
            .map(|i| placeholder(i, spaced(0.3, 0.7, i, main_count), "main"))
            .collect();
        let buffer = (0..buffer_count)
            .map(|i| placeholder(i, spaced(0.1, 0.9, i, buffer_count), "buffer"))
            .collect();
        Self::with_collections(main, buffer)
    }

    /// Get the number of calls made to this supplier.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this supplier.
    pub fn last_request(&self) -> Option<SupplyRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

fn spaced(lo: f64, hi: f64, i: usize, count: usize) -> f64 {
    if count <= 1 {
        lo
    } else {
        lo + i as f64 * ((hi - lo) / (count - 1) as f64)
    }
}

fn placeholder(n: usize, difficulty: f64, subset: &str) -> Question {
    let options: BTreeMap<String, String> = [
        ("A".to_string(), "Option A".to_string()),
        ("B".to_string(), "Option B".to_string()),
        ("C".to_string(), "Option C".to_string()),
        ("D".to_string(), "Option D".to_string()),
    ]
    .into_iter()
    .collect();
    Question::new(
        format!("Placeholder {subset} question {n}"),
        options,
        "A",
        difficulty,
        "Placeholder explanation.",
        "General",
    )
    .expect("placeholder question is valid")
}

#[async_trait]
impl QuestionSupplier for MockSupplier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn supply(&self, request: &SupplyRequest) -> anyhow::Result<SupplyResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        Ok(SupplyResponse {
            main: self.main.clone(),
            buffer: self.buffer.clone(),
        })
    }
}
