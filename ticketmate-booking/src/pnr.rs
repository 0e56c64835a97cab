use rand::Rng;
use std::collections::HashSet;
use tokio::sync::Mutex;

/// Issues unique human-facing booking references, format `PNR` plus
/// six digits. Codes stay reserved for the life of the process even
/// after the booking is cancelled; a PNR is never reassigned.
pub struct PnrGenerator {
    issued: Mutex<HashSet<String>>,
}

impl PnrGenerator {
    pub fn new() -> Self {
        Self {
            issued: Mutex::new(HashSet::new()),
        }
    }

    pub async fn generate(&self) -> String {
        let mut issued = self.issued.lock().await;
        loop {
            let code = random_code();
            if issued.insert(code.clone()) {
                return code;
            }
        }
    }
}

impl Default for PnrGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn random_code() -> String {
    let mut rng = rand::thread_rng();
    let digits: String = (0..6).map(|_| rng.gen_range(0..10).to_string()).collect();
    format!("PNR{}", digits)
}
