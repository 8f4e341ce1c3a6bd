pub const APPLICATION_NAME: &str = "picam-relay";

pub const LOG_TAG_MAIN: &str = "[MAIN]";
pub const LOG_TAG_POLL_LOOP: &str = "[POLL_LOOP]";
pub const LOG_TAG_BOOTSTRAP: &str = "[BOOTSTRAP]";
pub const LOG_TAG_COORDINATOR: &str = "[COORDINATOR]";
pub const LOG_TAG_STORAGE: &str = "[GCS]";
pub const LOG_TAG_OAUTH: &str = "[OAUTH]";
pub const LOG_TAG_CAPTURE: &str = "[CAPTURE]";
pub const LOG_TAG_CONFIG: &str = "[CONFIG]";
pub const LOG_TAG_INSTANCE: &str = "[INSTANCE]";

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_TOKEN_CACHE_FILE: &str = "cache.json";

pub const DEFAULT_BUCKET_NAME: &str = "pipark2014";
pub const DEFAULT_PROJECT_ID: &str = "pipark2014";
pub const DEFAULT_COORDINATOR_BASE_URL: &str = "http://www.pipark2014.appspot.com";
pub const DEFAULT_LOCATION_NAME: &str = "300ThirdStreet";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const COORDINATOR_CHECK_PATH: &str = "clientcheck";
pub const COORDINATOR_UPDATE_PATH: &str = "clientupdate";

pub const DEFAULT_IMAGE_PATH: &str = "./test.jpg";
pub const DEFAULT_OBJECT_PREFIX_ROOT: &str = "parkingspots/imgs";
pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

pub const DEFAULT_CAPTURE_COMMAND: &str = "raspistill";
pub const DEFAULT_CAPTURE_ARGS: [&str; 6] = ["-o", "test.jpg", "-w", "640", "-h", "480"];

pub const DEFAULT_VISIBILITY_ATTEMPTS: u32 = 3;
pub const DEFAULT_VISIBILITY_RETRY_DELAY_SECS: u64 = 2;

pub const STORAGE_API_BASE_URL: &str = "https://storage.googleapis.com";
pub const PUBLIC_READ_ENTITY: &str = "allUsers";
pub const PUBLIC_READ_ROLE: &str = "READER";

pub const OAUTH_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
pub const OAUTH_TOKEN_URL: &str = "https://accounts.google.com/o/oauth2/token";
pub const OAUTH_REDIRECT_URL: &str = "urn:ietf:wg:oauth:2.0:oob";
pub const OAUTH_STORAGE_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.full_control";
pub const OAUTH_EXPIRY_SKEW_SECS: i64 = 60;

pub const UPLOAD_FAILED_PLACEHOLDER: &str = "Error inserting image into Cloud Storage";

pub const INSTANCE_LOCK_FILE_NAME: &str = "picam-relay.lock";

pub const USER_MESSAGE_VISIT_AUTH_URL: &str =
    "Visit URL to get a code then run again with --code=YOUR_CODE";
