//! Global constants used throughout the docfill codebase.
//!
//! This module contains the token marker, expression delimiters, locale
//! conventions and other fixed values that are shared by the loader, the
//! resolvers and the substitution engine. Defining them centrally keeps the
//! extractor and the substitution engine from drifting apart.

/// Character that starts every placeholder token (`@nome`, `@taxa%`).
pub const TOKEN_MARKER: char = '@';

/// Opening delimiter of a computed field (`[calculo: @valor * @qtd]`).
pub const EXPRESSION_OPEN: &str = "[calculo:";

/// Closing delimiter of a computed field.
pub const EXPRESSION_CLOSE: char = ']';

/// Number of resolution passes over computed fields.
///
/// Three passes resolve a dependency chain at most three levels deep. Deeper
/// chains keep their textual form in the final map.
pub const MAX_EXPRESSION_PASSES: usize = 3;

/// Delimiter used by delimiter-separated (`.txt`) data files.
pub const FIELD_DELIMITER: char = ';';

/// Filename infix that marks a fact file for a folder alias (`..._INFO-{alias}.md`).
pub const FACT_FILE_INFIX: &str = "_INFO-";

/// Filename prefix of the unversioned fact file fallback (`INFO-{alias}.md`).
pub const FACT_FILE_FALLBACK_PREFIX: &str = "INFO-";

/// Currency symbol rendered in front of currency-like values.
pub const CURRENCY_SYMBOL: &str = "R$";

/// Thousands separator of the regional number convention.
pub const THOUSANDS_SEPARATOR: char = '.';

/// Decimal separator of the regional number convention.
pub const DECIMAL_SEPARATOR: char = ',';

/// Key-name substrings (lowercase) that classify a field as currency.
pub const CURRENCY_KEY_HINTS: &[&str] = &["valor", "custo", "total", "preco", "cub", "exec"];

/// Key-name substrings (lowercase) that classify a numeric field as a decimal quantity.
pub const DECIMAL_KEY_HINTS: &[&str] = &["area", "aceqv"];

/// Default value written over unresolved tokens when the cleaning policy is on.
pub const DEFAULT_MISSING_PLACEHOLDER: &str = "---";

/// Name of the generation history file written next to generated documents.
pub const HISTORY_LOG_FILE: &str = "history.log";

/// Default base URL of the monthly construction cost index (CUB) bulletins.
pub const DEFAULT_CUB_BASE_URL: &str = "https://www.sinduscongoias.com.br/arquivos/download/cub";

/// Extensions accepted as data files by listings and the loader.
pub const DATA_FILE_EXTENSIONS: &[&str] = &["md", "txt", "json"];

/// Maximum number of "did you mean" suggestions reported per missing token.
pub const MAX_TOKEN_SUGGESTIONS: usize = 3;
