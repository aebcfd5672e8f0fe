//! Runner tests with a scripted generation service

use std::cell::RefCell;

use tempfile::TempDir;
use topk_sweep::client::{GenerateRequest, GenerateResponse, Generator};
use topk_sweep::experiment::ResultsStore;
use topk_sweep::runner::{ExperimentRunner, FlushPolicy, Pacer, RecordSink};
use topk_sweep::sweep::SweepPlan;
use topk_sweep::{Error, Result, SamplingParams};

/// Records every request; fails the calls whose index is listed.
#[derive(Default)]
struct FakeService {
    fail_on: Vec<usize>,
    seen: RefCell<Vec<SamplingParams>>,
}

impl Generator for FakeService {
    fn generate(&self, request: &GenerateRequest<'_>) -> Result<GenerateResponse> {
        let index = self.seen.borrow().len();
        self.seen.borrow_mut().push(request.options);
        if self.fail_on.contains(&index) {
            return Err(Error::Generation("503 Service Unavailable".to_string()));
        }
        Ok(GenerateResponse {
            response: "The robot mixed blue and gold on its first canvas.".to_string(),
        })
    }
}

#[test]
fn test_default_grid_issues_50_calls_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("grid.json");
    let service = FakeService::default();
    let runner = ExperimentRunner::new(&service, "llama3.2", "paint", Pacer::none());
    let mut sink = RecordSink::open(&path, FlushPolicy::Each).unwrap();

    let summary = runner.run_sweep(&SweepPlan::default_grid(), &mut sink);

    assert_eq!(summary.attempted, 50);
    assert_eq!(summary.succeeded, 50);
    let seen = service.seen.borrow();
    assert_eq!(seen.len(), 50);

    let mut expected = Vec::new();
    for p in [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0] {
        for k in [10, 25, 50, 75, 100] {
            expected.push(SamplingParams::new(p, k));
        }
    }
    assert_eq!(*seen, expected);

    let stored = ResultsStore::load(&path).unwrap();
    assert_eq!(stored.len(), 50);
    assert!(stored.records().iter().all(|r| r.processing_time() >= 0.0));
}

#[test]
fn test_failed_call_mid_sweep_does_not_stop_it() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("flaky.json");
    let service = FakeService {
        fail_on: vec![2, 3],
        ..FakeService::default()
    };
    let runner = ExperimentRunner::new(&service, "llama3.2", "paint", Pacer::none());
    let mut sink = RecordSink::open(&path, FlushPolicy::Each).unwrap();

    let plan = SweepPlan::Grid {
        top_p: vec![0.5],
        top_k: vec![10, 25, 50, 75, 100],
    };
    let summary = runner.run_sweep(&plan, &mut sink);

    assert_eq!(service.seen.borrow().len(), 5);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.succeeded, 3);

    let stored = ResultsStore::load(&path).unwrap();
    let kept: Vec<u32> = stored.records().iter().map(|r| r.parameters().top_k).collect();
    assert_eq!(kept, vec![10, 25, 100]);
}

#[test]
fn test_sweep_appends_to_existing_store() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    let service = FakeService::default();
    let runner = ExperimentRunner::new(&service, "llama3.2", "paint", Pacer::none());

    let mut sink = RecordSink::open(&path, FlushPolicy::End).unwrap();
    runner.run_sweep(&SweepPlan::random(3, Some(1)), &mut sink);
    let (first, saved) = sink.finish();
    assert!(saved);

    let mut sink = RecordSink::open(&path, FlushPolicy::End).unwrap();
    runner.run_sweep(&SweepPlan::random(2, Some(2)), &mut sink);
    let (second, _) = sink.finish();

    assert_eq!(second.len(), 5);
    assert_eq!(&second.records()[..3], first.records());
}

#[test]
fn test_every_call_failing_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("down.json");
    let service = FakeService {
        fail_on: (0..10).collect(),
        ..FakeService::default()
    };
    let runner = ExperimentRunner::new(&service, "llama3.2", "paint", Pacer::none());
    let mut sink = RecordSink::open(&path, FlushPolicy::Each).unwrap();

    let summary = runner.run_sweep(&SweepPlan::random(10, None), &mut sink);
    let (store, saved) = sink.finish();

    assert_eq!(summary.failed, 10);
    assert!(saved);
    assert!(store.is_empty());
    assert!(!path.exists());
}

#[test]
fn test_pacer_delays_between_calls() {
    let temp_dir = TempDir::new().unwrap();
    let service = FakeService::default();
    let pacer = Pacer::new(std::time::Duration::from_millis(20));
    let runner = ExperimentRunner::new(&service, "m", "p", pacer);
    let mut sink = RecordSink::open(temp_dir.path().join("s.json"), FlushPolicy::End).unwrap();

    let start = std::time::Instant::now();
    runner.run_sweep(&SweepPlan::random(3, Some(5)), &mut sink);
    assert!(start.elapsed() >= std::time::Duration::from_millis(60));
}

/// Takes the output directory away on call `remove_at` and restores it on `restore_at`.
struct VanishingDirService {
    dir: std::path::PathBuf,
    remove_at: usize,
    restore_at: usize,
    calls: std::cell::Cell<usize>,
}

impl Generator for VanishingDirService {
    fn generate(&self, _request: &GenerateRequest<'_>) -> Result<GenerateResponse> {
        let index = self.calls.get();
        self.calls.set(index + 1);
        if index == self.remove_at {
            std::fs::remove_dir_all(&self.dir).unwrap();
        }
        if index == self.restore_at {
            std::fs::create_dir(&self.dir).unwrap();
        }
        Ok(GenerateResponse {
            response: "A short reply.".to_string(),
        })
    }
}

#[test]
fn test_save_failure_mid_sweep_drops_only_unsaved_records() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("out");
    std::fs::create_dir(&dir).unwrap();
    let path = dir.join("store.json");

    let service = VanishingDirService {
        dir: dir.clone(),
        remove_at: 1,
        restore_at: 3,
        calls: std::cell::Cell::new(0),
    };
    let runner = ExperimentRunner::new(&service, "llama3.2", "paint", Pacer::none());
    let mut sink = RecordSink::open(&path, FlushPolicy::Each).unwrap();

    let plan = SweepPlan::Grid {
        top_p: vec![0.5],
        top_k: vec![10, 25, 50, 75, 100],
    };
    let summary = runner.run_sweep(&plan, &mut sink);

    assert_eq!(summary.attempted, 5);
    assert_eq!(summary.succeeded, 5);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.save_failures, 2);

    let expected = vec![10, 75, 100];
    let in_memory: Vec<u32> = sink.store().records().iter().map(|r| r.parameters().top_k).collect();
    assert_eq!(in_memory, expected);

    let on_disk = ResultsStore::load(&path).unwrap();
    let kept: Vec<u32> = on_disk.records().iter().map(|r| r.parameters().top_k).collect();
    assert_eq!(kept, expected);
}
