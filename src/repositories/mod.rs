pub mod exercise_repo;
pub mod goal_repo;
pub mod plan_repo;
pub mod profile_repo;
pub mod token_repo;
pub mod user_repo;
pub mod weight_log_repo;
pub mod workout_repo;

pub use exercise_repo::ExerciseRepository;
pub use goal_repo::GoalRepository;
pub use plan_repo::PlanRepository;
pub use profile_repo::ProfileRepository;
pub use token_repo::{IssuedToken, TokenRepository};
pub use user_repo::UserRepository;
pub use weight_log_repo::WeightLogRepository;
pub use workout_repo::WorkoutRepository;

use crate::db::DbPool;

/// One handle per table group, all sharing the pool.
#[derive(Clone)]
pub struct Repositories {
    pub pool: DbPool,
    pub users: UserRepository,
    pub tokens: TokenRepository,
    pub profiles: ProfileRepository,
    pub exercises: ExerciseRepository,
    pub plans: PlanRepository,
    pub workouts: WorkoutRepository,
    pub weight_logs: WeightLogRepository,
    pub goals: GoalRepository,
}

impl Repositories {
    pub fn new(pool: DbPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            tokens: TokenRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool.clone()),
            exercises: ExerciseRepository::new(pool.clone()),
            plans: PlanRepository::new(pool.clone()),
            workouts: WorkoutRepository::new(pool.clone()),
            weight_logs: WeightLogRepository::new(pool.clone()),
            goals: GoalRepository::new(pool.clone()),
            pool,
        }
    }
}
