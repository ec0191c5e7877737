use crate::alphabet::nuc::to_nuc_seq;
use crate::io::fasta::{FastaReader, FastaRecordParsed};
use crate::run::nextclade_run_one::{analyze, NextcladeContext, NextcladeOutputs};
use crossbeam_channel::bounded;
use eyre::Report;
use std::collections::BTreeMap;
use std::thread;

/// Configuration for the parallel pipeline driver (spec §4.M).
#[derive(Clone, Debug)]
pub struct NextcladeRunOptions {
  /// Number of worker threads calling `analyze()` concurrently.
  pub jobs: usize,
  /// When set, results are delivered to the consumer in the same order as the input records,
  /// buffering faster workers' output until earlier sequences complete.
  pub in_order: bool,
}

impl Default for NextcladeRunOptions {
  fn default() -> Self {
    Self {
      jobs: num_cpus::get().max(1),
      in_order: true,
    }
  }
}

/// A per-sequence failure, recoverable at the pipeline level (spec §7): logged and turned into
/// an `errors.csv` row rather than aborting the run.
#[derive(Clone, Debug)]
pub struct AnalysisError {
  pub index: usize,
  pub seq_name: String,
  pub error: String,
}

/// One query sequence's outcome: either a full analysis, or a recoverable failure.
pub enum AnalysisOutcome {
  Success(Box<NextcladeOutputs>),
  Error(AnalysisError),
}

struct QueueItem {
  index: usize,
  seq_name: String,
  seq_str: String,
}

/// Runs `analyze()` over every record in `reader` against the shared `context`, using a
/// producer/worker-pool/consumer pipeline (spec §4.M): one thread streams FASTA records off
/// disk, `options.jobs` worker threads call `analyze()` on them (workers never share mutable
/// state — each only reads `context` and owns its own `QueueItem`), and `on_result` is invoked
/// on the calling thread for each completed sequence. If the producer hits a read error it logs
/// and stops feeding new work; sequences already queued still finish normally.
pub fn run_nextclade(
  mut reader: FastaReader,
  context: &NextcladeContext,
  options: &NextcladeRunOptions,
  mut on_result: impl FnMut(AnalysisOutcome),
) -> Result<(), Report> {
  let jobs = options.jobs.max(1);
  let (work_tx, work_rx) = bounded::<QueueItem>(jobs * 2);
  let (result_tx, result_rx) = bounded::<(usize, AnalysisOutcome)>(jobs * 2);

  thread::scope(|scope| {
    scope.spawn(move || {
      loop {
        let record = match reader.read() {
          Ok(Some(record)) => record,
          Ok(None) => break,
          Err(err) => {
            log::error!("When reading input sequences: {err:#}");
            break;
          }
        };
        let item = QueueItem {
          index: record.index,
          seq_name: record.seq_name,
          seq_str: record.seq,
        };
        if work_tx.send(item).is_err() {
          break;
        }
      }
    });

    for _ in 0..jobs {
      let work_rx = work_rx.clone();
      let result_tx = result_tx.clone();
      scope.spawn(move || {
        for item in &work_rx {
          let outcome = analyze_one(item, context);
          if result_tx.send(outcome).is_err() {
            break;
          }
        }
      });
    }
    drop(work_rx);
    drop(result_tx);

    if options.in_order {
      let mut pending = BTreeMap::new();
      let mut next_index = 0usize;
      for (index, outcome) in &result_rx {
        pending.insert(index, outcome);
        while let Some(outcome) = pending.remove(&next_index) {
          on_result(outcome);
          next_index += 1;
        }
      }
      for (_, outcome) in pending {
        on_result(outcome);
      }
    } else {
      for (_, outcome) in &result_rx {
        on_result(outcome);
      }
    }
  });

  Ok(())
}

fn analyze_one(item: QueueItem, context: &NextcladeContext) -> (usize, AnalysisOutcome) {
  let outcome = match to_nuc_seq(&item.seq_str) {
    Ok(seq) => {
      let fasta = FastaRecordParsed {
        seq_name: item.seq_name.clone(),
        seq,
        index: item.index,
      };
      match analyze(&fasta, context) {
        Ok(outputs) => AnalysisOutcome::Success(Box::new(outputs)),
        Err(err) => AnalysisOutcome::Error(AnalysisError {
          index: item.index,
          seq_name: item.seq_name,
          error: err.to_string(),
        }),
      }
    }
    Err(err) => AnalysisOutcome::Error(AnalysisError {
      index: item.index,
      seq_name: item.seq_name,
      error: err.to_string(),
    }),
  };
  (item.index, outcome)
}
