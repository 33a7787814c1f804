//! Orchestrator state-machine tests with deterministic stub engines.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mirage_api::orchestrator::JobOrchestrator;
use mirage_core::engine::EngineKind;
use mirage_db::models::job::{Job, NewJob};
use mirage_db::models::status::JobStatus;
use mirage_db::repositories::JobRepo;
use mirage_engines::{EngineAdapter, EngineError, EngineRegistry, RenderRequest};
use sqlx::SqlitePool;

/// A scripted engine: fixed outcome, optional render delay, call counter.
struct StubEngine {
    kind: EngineKind,
    outcome: Result<String, String>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl EngineAdapter for StubEngine {
    fn kind(&self) -> EngineKind {
        self.kind
    }

    async fn process(&self, _request: &RenderRequest) -> Result<String, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        match &self.outcome {
            Ok(locator) => Ok(locator.clone()),
            Err(msg) => Err(EngineError::Process(msg.clone())),
        }
    }
}

fn stub(
    kind: EngineKind,
    outcome: Result<&str, &str>,
    delay: Duration,
) -> (Arc<StubEngine>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let adapter = Arc::new(StubEngine {
        kind,
        outcome: outcome.map(str::to_string).map_err(str::to_string),
        delay,
        calls: Arc::clone(&calls),
    });
    (adapter, calls)
}

fn orchestrator(pool: &SqlitePool, registry: EngineRegistry) -> JobOrchestrator {
    JobOrchestrator::new(pool.clone(), Arc::new(registry))
        .with_progress_interval(Duration::from_millis(1))
}

async fn seed_job(pool: &SqlitePool, job_id: &str, engine: EngineKind) -> Job {
    JobRepo::create(
        pool,
        &NewJob {
            job_id: job_id.to_string(),
            voice_id: "voice_test".to_string(),
            avatar_url: "/data/uploads/avatar.png".to_string(),
            script_mode: "manual".to_string(),
            script_input: "hello".to_string(),
            preferred_engine: engine.as_str().to_string(),
            generated_script: "hello".to_string(),
        },
    )
    .await
    .unwrap()
}

fn request_for(job_id: &str) -> RenderRequest {
    RenderRequest {
        job_id: job_id.to_string(),
        voice_id: "voice_test".to_string(),
        avatar_url: "/data/uploads/avatar.png".to_string(),
        script_text: "hello".to_string(),
        options: serde_json::Value::Null,
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn default_engine_success_completes_without_fallback(pool: SqlitePool) {
    let (wan2gp, wan2gp_calls) = stub(
        EngineKind::Wan2gp,
        Ok("/data/outputs/job_1_wan2gp.mp4"),
        Duration::ZERO,
    );
    let orchestrator = orchestrator(&pool, EngineRegistry::new(wan2gp));

    seed_job(&pool, "job_1", EngineKind::Wan2gp).await;
    orchestrator
        .run(EngineKind::Wan2gp, request_for("job_1"))
        .await;

    let job = JobRepo::find_by_id(&pool, "job_1").await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);
    assert_eq!(job.message, "Done");
    assert_eq!(job.selected_engine, "wan2gp");
    assert_eq!(job.fallback_reason, None);
    assert_eq!(
        job.result_url.as_deref(),
        Some("/data/outputs/job_1_wan2gp.mp4")
    );
    assert_eq!(wan2gp_calls.load(Ordering::SeqCst), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn quality_engine_failure_falls_back_once_and_completes(pool: SqlitePool) {
    let (wan2gp, wan2gp_calls) = stub(
        EngineKind::Wan2gp,
        Ok("/data/outputs/job_2_wan2gp.mp4"),
        Duration::ZERO,
    );
    let (infinitetalk, infinitetalk_calls) = stub(
        EngineKind::Infinitetalk,
        Err("InfiniteTalk engine subprocess hit a VRAM OOM error or timeout"),
        Duration::ZERO,
    );
    let registry = EngineRegistry::new(wan2gp).register(infinitetalk);
    let orchestrator = orchestrator(&pool, registry);

    seed_job(&pool, "job_2", EngineKind::Infinitetalk).await;
    orchestrator
        .run(EngineKind::Infinitetalk, request_for("job_2"))
        .await;

    let job = JobRepo::find_by_id(&pool, "job_2").await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.selected_engine, "wan2gp");
    assert!(job
        .fallback_reason
        .as_deref()
        .unwrap()
        .contains("VRAM OOM"));
    assert_eq!(
        job.result_url.as_deref(),
        Some("/data/outputs/job_2_wan2gp.mp4")
    );
    assert_eq!(infinitetalk_calls.load(Ordering::SeqCst), 1);
    assert_eq!(wan2gp_calls.load(Ordering::SeqCst), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn both_engines_failing_marks_the_job_failed(pool: SqlitePool) {
    let (wan2gp, wan2gp_calls) = stub(
        EngineKind::Wan2gp,
        Err("renderer subprocess crashed"),
        Duration::ZERO,
    );
    let (infinitetalk, infinitetalk_calls) = stub(
        EngineKind::Infinitetalk,
        Err("InfiniteTalk engine subprocess hit a VRAM OOM error or timeout"),
        Duration::ZERO,
    );
    let registry = EngineRegistry::new(wan2gp).register(infinitetalk);
    let orchestrator = orchestrator(&pool, registry);

    seed_job(&pool, "job_3", EngineKind::Infinitetalk).await;
    orchestrator
        .run(EngineKind::Infinitetalk, request_for("job_3"))
        .await;

    let job = JobRepo::find_by_id(&pool, "job_3").await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    // The terminal message carries the fallback engine's error, and the
    // recorded fallback reason carries the primary's.
    assert!(job.message.contains("renderer subprocess crashed"));
    assert!(job
        .fallback_reason
        .as_deref()
        .unwrap()
        .contains("VRAM OOM"));
    assert_eq!(job.result_url, None);
    // Failover is taken at most once.
    assert_eq!(infinitetalk_calls.load(Ordering::SeqCst), 1);
    assert_eq!(wan2gp_calls.load(Ordering::SeqCst), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn default_engine_failure_does_not_fall_back(pool: SqlitePool) {
    let (wan2gp, _) = stub(
        EngineKind::Wan2gp,
        Err("out of disk space"),
        Duration::ZERO,
    );
    let (infinitetalk, infinitetalk_calls) = stub(
        EngineKind::Infinitetalk,
        Ok("/data/outputs/job_4_infinitetalk.mp4"),
        Duration::ZERO,
    );
    let registry = EngineRegistry::new(wan2gp).register(infinitetalk);
    let orchestrator = orchestrator(&pool, registry);

    seed_job(&pool, "job_4", EngineKind::Wan2gp).await;
    orchestrator
        .run(EngineKind::Wan2gp, request_for("job_4"))
        .await;

    let job = JobRepo::find_by_id(&pool, "job_4").await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.selected_engine, "wan2gp");
    assert_eq!(job.fallback_reason, None);
    assert!(job.message.contains("out of disk space"));
    assert_eq!(infinitetalk_calls.load(Ordering::SeqCst), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn terminal_state_survives_the_progress_reporter(pool: SqlitePool) {
    // A render slow enough for several 1ms progress ticks to land while it
    // runs; the terminal write must still be the last word.
    let (wan2gp, _) = stub(
        EngineKind::Wan2gp,
        Ok("/data/outputs/job_5_wan2gp.mp4"),
        Duration::from_millis(30),
    );
    let orchestrator = orchestrator(&pool, EngineRegistry::new(wan2gp));

    seed_job(&pool, "job_5", EngineKind::Wan2gp).await;
    orchestrator
        .run(EngineKind::Wan2gp, request_for("job_5"))
        .await;

    let job = JobRepo::find_by_id(&pool, "job_5").await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);
    assert_eq!(job.message, "Done");

    // Nothing mutates the row after the terminal write.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let later = JobRepo::find_by_id(&pool, "job_5").await.unwrap().unwrap();
    assert_eq!(later.status, JobStatus::Completed);
    assert_eq!(later.progress, 100);
    assert_eq!(later.message, "Done");
    assert_eq!(later.updated_at, job.updated_at);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn progress_updates_are_visible_while_running(pool: SqlitePool) {
    let (wan2gp, _) = stub(
        EngineKind::Wan2gp,
        Ok("/data/outputs/job_6_wan2gp.mp4"),
        Duration::from_millis(50),
    );
    let orchestrator = Arc::new(orchestrator(&pool, EngineRegistry::new(wan2gp)));

    seed_job(&pool, "job_6", EngineKind::Wan2gp).await;

    let handle = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move {
            orchestrator
                .run(EngineKind::Wan2gp, request_for("job_6"))
                .await;
        })
    };

    // Watch for at least one intermediate progress value strictly between
    // the initial mark and completion.
    let mut saw_intermediate = false;
    for _ in 0..100 {
        let job = JobRepo::find_by_id(&pool, "job_6").await.unwrap().unwrap();
        if job.status == JobStatus::Running && job.progress > 10 && job.progress < 100 {
            saw_intermediate = true;
            break;
        }
        if job.status.is_terminal() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    handle.await.unwrap();

    assert!(saw_intermediate, "never observed an intermediate progress tick");
    let job = JobRepo::find_by_id(&pool, "job_6").await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);
}
