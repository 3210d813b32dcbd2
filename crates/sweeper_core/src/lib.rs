//! Sweeper core: pure keyword policy, ledgers and the work-unit state machine.
mod batch;
mod effect;
mod filter;
mod keywords;
mod ledger;
mod msg;
mod policy;
mod settings;
mod state;
mod status;
mod tally;
mod update;

pub use batch::{partition, Batch};
pub use effect::UnitEffect;
pub use filter::{filter_keywords, FilterOptions, FilterReport};
pub use keywords::KeywordStore;
pub use ledger::Ledger;
pub use msg::UnitMsg;
pub use policy::{parse_result_count, scoped_query, PersonalDomains, DEFAULT_PERSONAL_DOMAINS};
pub use settings::{Pacing, SweepSettings};
pub use state::{UnitOutcome, UnitState, WorkUnit};
pub use status::{RunStatus, SweepEvent, LOG_TAIL_LIMIT};
pub use tally::{render_keyword_block, AnalysisReport, SenderTally};
pub use update::update;
