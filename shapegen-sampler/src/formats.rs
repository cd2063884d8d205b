//! Generators for well-known string formats: UUIDs, email addresses and URLs.

use rand::Rng;

use crate::config::GeneratorConfig;
use crate::error::SampleError;
use crate::generator::Generator;

const LOWER_ALNUM: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const LOCAL_PART: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_+-";

fn random_word(rng: &mut dyn rand::RngCore, alphabet: &[u8], min: usize, max: usize) -> String {
    let length = rng.gen_range(min..=max);
    (0..length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

// ============================================================================
// UUID Generator
// ============================================================================

/// Generator for UUID v4 (random UUIDs)
///
/// Generates valid UUID v4 strings in the standard format:
/// xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx
///
/// Where x is any hex digit and y is one of 8, 9, a, or b.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4Generator;

impl UuidV4Generator {
    /// Create a new UUID v4 generator
    pub fn new() -> Self {
        Self
    }

    fn format_uuid(bytes: [u8; 16]) -> String {
        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        )
    }
}

impl Generator<String> for UuidV4Generator {
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        _config: &GeneratorConfig,
    ) -> Result<String, SampleError> {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);

        // Set version to 4 (bits 12-15 of time_hi_and_version)
        bytes[6] = (bytes[6] & 0x0f) | 0x40;

        // Set variant to RFC4122 (bits 6-7 of clock_seq_hi_and_reserved)
        bytes[8] = (bytes[8] & 0x3f) | 0x80;

        Ok(Self::format_uuid(bytes))
    }
}

// ============================================================================
// Email Generator
// ============================================================================

/// Generator for email addresses
///
/// The local part is made of dot-separated words of letters, digits, `_`, `+`
/// and `-`; the domain is made of alphanumeric labels followed by a
/// top-level domain.
#[derive(Debug, Clone)]
pub struct EmailGenerator {
    max_local_segments: usize,
    max_domain_labels: usize,
}

impl EmailGenerator {
    /// Create a new email generator with default shapes
    pub fn new() -> Self {
        Self {
            max_local_segments: 3,
            max_domain_labels: 2,
        }
    }

    fn generate_local_part(&self, rng: &mut dyn rand::RngCore) -> String {
        let segments = rng.gen_range(1..=self.max_local_segments);
        (0..segments)
            .map(|_| random_word(rng, LOCAL_PART, 1, 8))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn generate_domain(&self, rng: &mut dyn rand::RngCore) -> String {
        let labels = rng.gen_range(1..=self.max_domain_labels);
        let mut parts: Vec<String> = (0..labels)
            .map(|_| random_word(rng, LOWER_ALNUM, 1, 12))
            .collect();

        let tlds = ["com", "org", "net", "edu", "gov", "io", "dev"];
        parts.push(tlds[rng.gen_range(0..tlds.len())].to_string());
        parts.join(".")
    }
}

impl Default for EmailGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator<String> for EmailGenerator {
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        _config: &GeneratorConfig,
    ) -> Result<String, SampleError> {
        let local = self.generate_local_part(rng);
        let domain = self.generate_domain(rng);
        Ok(format!("{}@{}", local, domain))
    }
}

// ============================================================================
// URL Generator
// ============================================================================

/// Generator for URLs with various schemes
#[derive(Debug, Clone)]
pub struct UrlGenerator {
    schemes: Vec<&'static str>,
    include_port: bool,
    include_path: bool,
    include_query: bool,
}

impl UrlGenerator {
    /// Create a new URL generator with http/https schemes
    pub fn new() -> Self {
        Self::with_schemes(vec!["http", "https"])
    }

    /// Create a URL generator with custom schemes
    pub fn with_schemes(schemes: Vec<&'static str>) -> Self {
        Self {
            schemes,
            include_port: true,
            include_path: true,
            include_query: true,
        }
    }

    /// Set whether to include port numbers
    pub fn with_port(mut self, include: bool) -> Self {
        self.include_port = include;
        self
    }

    /// Set whether to include paths
    pub fn with_path(mut self, include: bool) -> Self {
        self.include_path = include;
        self
    }

    /// Set whether to include query parameters
    pub fn with_query(mut self, include: bool) -> Self {
        self.include_query = include;
        self
    }

    fn generate_host(&self, rng: &mut dyn rand::RngCore) -> String {
        let domain = random_word(rng, LOWER_ALNUM, 3, 15);
        let tlds = ["com", "org", "net", "io", "dev"];
        format!("{}.{}", domain, tlds[rng.gen_range(0..tlds.len())])
    }

    fn generate_path(&self, rng: &mut dyn rand::RngCore) -> String {
        let segments = rng.gen_range(1..=4);
        let parts: Vec<String> = (0..segments)
            .map(|_| random_word(rng, b"abcdefghijklmnopqrstuvwxyz0123456789_-", 1, 9))
            .collect();
        format!("/{}", parts.join("/"))
    }

    fn generate_query(&self, rng: &mut dyn rand::RngCore) -> String {
        let params = rng.gen_range(1..=3);
        let pairs: Vec<String> = (0..params)
            .map(|_| {
                let key = random_word(rng, LOWER_ALNUM, 1, 7);
                let value = random_word(rng, LOWER_ALNUM, 0, 9);
                format!("{}={}", key, value)
            })
            .collect();
        format!("?{}", pairs.join("&"))
    }
}

impl Default for UrlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator<String> for UrlGenerator {
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        _config: &GeneratorConfig,
    ) -> Result<String, SampleError> {
        let scheme = self.schemes[rng.gen_range(0..self.schemes.len())];
        let mut url = format!("{}://{}", scheme, self.generate_host(rng));

        if self.include_port && rng.gen_bool(0.5) {
            url.push_str(&format!(":{}", rng.gen_range(1..=65535u32)));
        }
        if self.include_path && rng.gen_bool(0.5) {
            url.push_str(&self.generate_path(rng));
        }
        if self.include_query && rng.gen_bool(0.3) {
            url.push_str(&self.generate_query(rng));
        }

        Ok(url)
    }
}
