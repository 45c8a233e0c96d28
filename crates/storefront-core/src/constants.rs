//! Constants shared by the HTTP service, the import pipeline and the worker.

/// Key prefix for freshly uploaded CSV files. Create events under this prefix trigger the import.
pub const INCOMING_PREFIX: &str = "uploaded/";

/// Key prefix that parsed files are moved to.
pub const DONE_PREFIX: &str = "parsed/";

/// Content type the signed upload URL is issued for.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Default lifetime of a signed upload URL.
pub const IMPORT_URL_EXPIRY_SECS: u64 = 5 * 60;

/// Default number of catalog messages delivered to one batch consumer invocation.
pub const CATALOG_BATCH_SIZE: usize = 5;

/// SQS refuses receive requests for more than ten messages.
pub const MAX_QUEUE_BATCH_SIZE: usize = 10;

/// Wall-clock budget for a single invocation of a pipeline stage.
pub const INVOCATION_TIMEOUT_SECS: u64 = 30;

/// Price at which notifications switch from the low-price to the high-price subscription.
pub const PRICE_THRESHOLD: f64 = 50.0;

/// Message attribute carrying the product price on published notifications.
pub const PRICE_ATTRIBUTE: &str = "price";

/// Subject used for the failure notification published when a whole batch fails.
pub const BATCH_FAILURE_SUBJECT: &str = "Error Creating Products";

/// Body returned by the batch consumer regardless of per-item outcome.
pub const BATCH_SUCCESS_MESSAGE: &str = "Products processed successfully";

/// Body returned by the upload-event handler once every record was handled.
pub const IMPORT_SUCCESS_MESSAGE: &str = "Processing completed";
