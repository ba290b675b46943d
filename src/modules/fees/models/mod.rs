pub mod fee_record;

pub use fee_record::{
    CreateFeeOutcome, CreateFeeRequest, EditFeeFields, FeeFilters, FeeRecord, FeeStatus,
    ReferencePeriod, MAX_MONTH_COUNT,
};
