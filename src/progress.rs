use anyhow::Result;
use tracing::info;

/// Lesson-progress collaborator.
///
/// The session controller reports completion exactly once per session and
/// practice time on close; persistence lives with the host app.
#[async_trait::async_trait]
pub trait LessonProgress: Send + Sync {
    async fn mark_lesson_complete(&self, lesson_id: u32, unit_id: u32) -> Result<()>;
    async fn add_practice_minutes(&self, minutes: u32) -> Result<()>;
}

/// Progress sink that only logs. Used for simulation sessions and the
/// console client.
pub struct NullProgress;

#[async_trait::async_trait]
impl LessonProgress for NullProgress {
    async fn mark_lesson_complete(&self, lesson_id: u32, unit_id: u32) -> Result<()> {
        info!(lesson_id, unit_id, "lesson complete (not persisted)");
        Ok(())
    }

    async fn add_practice_minutes(&self, minutes: u32) -> Result<()> {
        info!(minutes, "practice time recorded (not persisted)");
        Ok(())
    }
}
