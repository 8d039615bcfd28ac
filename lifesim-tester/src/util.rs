use anyhow::{Result, bail};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse comma-separated seeds. Negative values fold to their magnitude.
pub fn parse_seeds(tokens: &str) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    for token in split_csv(tokens) {
        if let Ok(value) = token.parse::<u64>() {
            seeds.push(value);
        } else if let Ok(value) = token.parse::<i64>() {
            seeds.push(value.unsigned_abs());
        } else {
            bail!("invalid seed `{token}`");
        }
    }
    if seeds.is_empty() {
        bail!("no seeds given");
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" alpha, ,beta,  gamma ");
        assert_eq!(parts, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn seeds_parse_numbers_only() {
        assert_eq!(parse_seeds("1,-2, 18446744073709551615").unwrap(), vec![1, 2, u64::MAX]);
        assert!(parse_seeds("1,two").is_err());
        assert!(parse_seeds(" , ").is_err());
    }
}
