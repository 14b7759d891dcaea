mod balance_analyzer;
mod balancer;
mod planner;

pub use balance_analyzer::{
    analyze_dataset, get_recommendations, suggested_target, BalanceStats, ClassCount,
    TargetStrategy,
};
pub use balancer::{
    balance, balance_with_config, execute_balance_plan, execute_class_plan, BalanceProgressMessage,
    BalanceSummary, ClassReport,
};
pub use planner::{
    augmented_file_name, calculate_balance_plan, decide_outcome, generate_token, plan_class,
    BalanceAction, BalanceConfig, BalanceOutcome, BalancePlan, ClassPlan, AUGMENTED_PREFIX,
    TOKEN_LENGTH,
};
