//! Runtime configuration from the command line

use crate::api::{Endpoints, DEFAULT_API_BASE, DEFAULT_SPRITE_URL};
use crate::state::DEFAULT_PAGE_SIZE;

#[derive(clap::Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Records fetched per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
    pub page_size: usize,

    /// PokeAPI base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Sprite URL template; `{id}` is replaced with the Pokemon number
    #[arg(long, default_value = DEFAULT_SPRITE_URL)]
    pub sprite_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub page_size: usize,
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            endpoints: Endpoints::default(),
        }
    }
}

impl From<ConfigArgs> for Config {
    fn from(args: ConfigArgs) -> Self {
        Self {
            page_size: args.page_size,
            endpoints: Endpoints::new(args.api_base, args.sprite_url),
        }
    }
}

fn parse_page_size(value: &str) -> Result<usize, String> {
    let size: usize = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if size == 0 {
        return Err("page size must be at least 1".to_string());
    }
    Ok(size)
}
