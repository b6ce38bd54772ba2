/*!
 * Tests for batch dispatch building blocks: output naming, pool sizing
 * and the job state machine
 */

use std::fs;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, channel};
use std::sync::Mutex as StdMutex;
use std::time::Duration;
use anyhow::Result;
use vttzero::app_config::{NamingConfig, OperationKind};
use vttzero::batch_dispatcher::{
    BatchDispatcher, BatchJob, BatchOutcome, JobState, NullProgressSink, NullRenamePrompt,
    RenamePrompt, resolve_output_name, worker_pool_size,
};
use vttzero::errors::DispatchError;
use crate::common::{self, ScriptedPrompt};

fn sequential_naming(prefix: &str) -> NamingConfig {
    NamingConfig {
        sequential_numbering: true,
        sequence_prefix: prefix.to_string(),
        interactive_rename: false,
    }
}

/// Test sequential numbering with a prefix
#[test]
fn test_resolve_output_name_withSequentialPrefix_shouldNumberFromPrefix() {
    let naming = sequential_naming("ep");

    for index in 1..=3 {
        let name = resolve_output_name("ignored", index, &naming, &NullRenamePrompt);
        assert_eq!(name, format!("ep{}.vtt", index));
    }
}

/// Test sequential numbering with an empty prefix
#[test]
fn test_resolve_output_name_withEmptyPrefix_shouldUseBareIndex() {
    let naming = sequential_naming("  ");
    assert_eq!(
        resolve_output_name("ignored", 7, &naming, &NullRenamePrompt),
        "7.vtt"
    );
}

/// Test the default index-suffixed naming scheme
#[test]
fn test_resolve_output_name_withDefaultPolicy_shouldSuffixIndex() {
    let naming = NamingConfig::default();
    assert_eq!(
        resolve_output_name("movie", 2, &naming, &NullRenamePrompt),
        "movie_2.vtt"
    );
}

/// Test that a supplied interactive answer is suffixed with the index
#[test]
fn test_resolve_output_name_withInteractiveAnswer_shouldSuffixIndex() {
    let naming = NamingConfig {
        interactive_rename: true,
        ..NamingConfig::default()
    };
    let prompt = ScriptedPrompt::new(vec![Some("renamed")]);

    assert_eq!(
        resolve_output_name("movie", 3, &naming, &prompt),
        "renamed_3.vtt"
    );
}

/// Test that a blank interactive answer keeps the derived base name
#[test]
fn test_resolve_output_name_withBlankAnswer_shouldKeepBaseName() {
    let naming = NamingConfig {
        interactive_rename: true,
        ..NamingConfig::default()
    };

    let blank = ScriptedPrompt::new(vec![Some("   ")]);
    assert_eq!(resolve_output_name("movie", 3, &naming, &blank), "movie.vtt");

    let cancelled = ScriptedPrompt::new(vec![None]);
    assert_eq!(
        resolve_output_name("movie", 3, &naming, &cancelled),
        "movie.vtt"
    );
}

/// Test the worker pool size bounds
#[test]
fn test_worker_pool_size_shouldBeBetweenTwoAndFour() {
    let size = worker_pool_size();
    assert!((2..=4).contains(&size));
}

/// Test the initial job state
#[test]
fn test_dispatcher_new_shouldStartIdle() {
    let dispatcher = BatchDispatcher::new();
    assert_eq!(dispatcher.state(), JobState::Idle);
}

/// Test that a missing input directory fails the job before processing
#[tokio::test]
async fn test_run_withMissingInputDir_shouldFailAndFinalize() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let job = BatchJob {
        operation: OperationKind::ZeroHourVtt,
        input_dir: temp_dir.path().join("missing"),
        output_dir: temp_dir.path().join("out"),
        naming: NamingConfig::default(),
        parallel: false,
    };
    let dispatcher = BatchDispatcher::new();

    let result = dispatcher
        .run(&job, &NullRenamePrompt, Arc::new(NullProgressSink))
        .await;

    assert!(matches!(result, Err(DispatchError::InputDirMissing(_))));
    // The job still finalizes, so a new one may be started
    assert_eq!(dispatcher.state(), JobState::Complete);
    // Nothing was created before the configuration check failed
    assert!(!temp_dir.path().join("out").exists());

    Ok(())
}

/// Rename prompt that blocks until the test releases it
struct GatedPrompt {
    gate: StdMutex<Receiver<()>>,
}

impl RenamePrompt for GatedPrompt {
    fn ask(&self, _base_name: &str) -> Option<String> {
        let _ = self.gate.lock().unwrap().recv();
        None
    }
}

/// Test that starting a job while one runs is rejected synchronously
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_run_whileRunning_shouldRejectSecondStart() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("in");
    fs::create_dir(&input_dir)?;
    common::create_test_vtt(&input_dir.to_path_buf(), "a.vtt")?;

    let job = BatchJob {
        operation: OperationKind::ZeroHourVtt,
        input_dir,
        output_dir: temp_dir.path().join("out"),
        naming: NamingConfig {
            interactive_rename: true,
            ..NamingConfig::default()
        },
        parallel: false,
    };

    let (release, gate) = channel();
    let prompt = Arc::new(GatedPrompt {
        gate: StdMutex::new(gate),
    });

    let dispatcher = Arc::new(BatchDispatcher::new());
    let first = {
        let dispatcher = Arc::clone(&dispatcher);
        let job = job.clone();
        let prompt = Arc::clone(&prompt);
        tokio::spawn(async move {
            dispatcher
                .run(&job, prompt.as_ref(), Arc::new(NullProgressSink))
                .await
        })
    };

    // Wait for the first job to hold the running state inside the prompt
    while dispatcher.state() != JobState::Running {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let second = dispatcher
        .run(&job, &NullRenamePrompt, Arc::new(NullProgressSink))
        .await;
    assert!(matches!(second, Err(DispatchError::JobAlreadyRunning)));

    // Release the first job and let it finish normally
    release.send(()).unwrap();
    let outcome = first.await??;
    assert!(matches!(outcome, BatchOutcome::Completed(_)));
    assert_eq!(dispatcher.state(), JobState::Complete);

    // A finished dispatcher accepts the next job
    let again = dispatcher
        .run(&job, &NullRenamePrompt, Arc::new(NullProgressSink))
        .await?;
    assert!(matches!(again, BatchOutcome::Completed(_)));

    Ok(())
}
