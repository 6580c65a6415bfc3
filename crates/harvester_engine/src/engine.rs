use std::path::PathBuf;
use std::sync::Arc;

use harvest_logging::{harvest_debug, harvest_error, harvest_info, harvest_trace};
use harvester_core::{BookAddress, HarvestProgress};
use tokio::sync::{mpsc, Mutex};

use crate::HarvestError;

/// One unit of work of the harvest: a book address in, a written file out.
#[async_trait::async_trait]
pub trait BookProcessor: Send + Sync {
    async fn process(&self, address: &str) -> Result<PathBuf, HarvestError>;
}

/// Sent by a worker once it is done with an address, whatever the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub address: BookAddress,
    pub succeeded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HarvestReport {
    /// Counts, as recorded for the progress lines.
    pub progress: HarvestProgress,
    /// In the order workers finished, not the order addresses were sent.
    pub completions: Vec<Completion>,
}

impl HarvestReport {
    pub fn total(&self) -> usize {
        self.progress.total()
    }

    pub fn succeeded(&self) -> usize {
        self.progress.succeeded()
    }

    pub fn failed(&self) -> usize {
        self.progress.failed()
    }

    pub fn is_complete(&self) -> bool {
        self.progress.is_done()
    }
}

type WorkQueue = Arc<Mutex<mpsc::Receiver<BookAddress>>>;

/// Runs `processor` over every address on a pool of `workers` tasks.
///
/// Addresses are handed out in order through one shared queue; a failed book
/// is logged by its worker and still counts as a completion. Returns once
/// every address has completed, or once no worker is left to complete one.
pub async fn harvest(
    processor: Arc<dyn BookProcessor>,
    addresses: Vec<BookAddress>,
    workers: usize,
) -> HarvestReport {
    let total = addresses.len();
    let workers = workers.max(1);

    let (work_tx, work_rx) = mpsc::channel::<BookAddress>(workers);
    let work_rx: WorkQueue = Arc::new(Mutex::new(work_rx));
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();

    for worker_id in 0..workers {
        tokio::spawn(worker_loop(
            worker_id,
            processor.clone(),
            work_rx.clone(),
            done_tx.clone(),
        ));
    }
    drop(done_tx);

    tokio::spawn(async move {
        for address in addresses {
            if work_tx.send(address).await.is_err() {
                break;
            }
        }
        // dropping the sender closes the queue
    });

    let mut progress = HarvestProgress::new(total);
    let mut completions = Vec::with_capacity(total);
    while !progress.is_done() {
        let Some(completion) = done_rx.recv().await else {
            break;
        };
        let line = progress.record(&completion.address, completion.succeeded);
        harvest_info!("{}", line);
        completions.push(completion);
    }

    if !progress.is_done() {
        harvest_error!(
            "Workers stopped with {} of {} addresses unfinished",
            progress.remaining(),
            total
        );
    }

    HarvestReport {
        progress,
        completions,
    }
}

async fn worker_loop(
    worker_id: usize,
    processor: Arc<dyn BookProcessor>,
    work_rx: WorkQueue,
    done_tx: mpsc::UnboundedSender<Completion>,
) {
    loop {
        let next = work_rx.lock().await.recv().await;
        let Some(address) = next else {
            break;
        };
        harvest_trace!("[worker {}] took {}", worker_id, address);

        let succeeded = match processor.process(&address).await {
            Ok(_) => true,
            Err(err) => {
                harvest_error!("[worker {}] {}", worker_id, err);
                false
            }
        };

        if done_tx.send(Completion { address, succeeded }).is_err() {
            break;
        }
    }
    harvest_debug!("[worker {}] input closed", worker_id);
}
