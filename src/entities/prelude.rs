pub use super::fed_weekly::Entity as FedWeekly;
pub use super::policy_rates::Entity as PolicyRates;
pub use super::repo_rates::Entity as RepoRates;
