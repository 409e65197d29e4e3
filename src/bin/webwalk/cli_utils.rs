use web_walker::cell::{Cell, MAX_COORDINATE, MAX_PLANE};
use web_walker::errors::{WalkerError, WalkerResult};

/// Generic parser for delimited strings into a fixed number of values
pub fn parse_delimited<T, const N: usize>(
    input: &str,
    delimiter: char,
    type_name: &str,
    parser: impl Fn(&str) -> Result<T, std::num::ParseIntError>,
) -> WalkerResult<[T; N]>
where
    T: Copy + Default,
{
    let parts: Vec<&str> = input.split(delimiter).map(str::trim).collect();
    if parts.len() != N {
        return Err(WalkerError::InvalidArgument {
            reason: format!(
                "Invalid {type_name} format '{input}'. Expected {N} {delimiter}-separated values"
            ),
        });
    }

    let mut result = [T::default(); N];
    for (i, part) in parts.iter().enumerate() {
        result[i] = parser(part).map_err(|_| WalkerError::InvalidArgument {
            reason: format!("Invalid {type_name} value: '{part}'"),
        })?;
    }

    Ok(result)
}

/// Parse a cell given as "X,Y,PLANE"
pub fn parse_cell(input: &str) -> WalkerResult<Cell> {
    let [x, y, plane] = parse_delimited::<i32, 3>(input, ',', "cell", |s| s.parse())?;

    let cell = Cell::new(x, y, plane);
    if !cell.in_world() {
        return Err(WalkerError::InvalidArgument {
            reason: format!(
                "Cell {cell} is outside the world (x and y in 0..={MAX_COORDINATE}, plane in 0..={MAX_PLANE})"
            ),
        });
    }

    Ok(cell)
}

/// Clamp a movement failure probability into [0, 1]
pub fn validate_probability(probability: f64) -> f64 {
    if !(0.0..=1.0).contains(&probability) {
        tracing::warn!("Failure probability {probability} is out of range [0.0, 1.0], clamping");
        probability.clamp(0.0, 1.0)
    } else {
        probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("3222,3218,0").unwrap(), Cell::new(3222, 3218, 0));
        assert_eq!(parse_cell(" 3205, 3209, 1 ").unwrap(), Cell::new(3205, 3209, 1));

        assert!(parse_cell("3222,3218").is_err());
        assert!(parse_cell("a,b,c").is_err());
        assert!(parse_cell("1,2,4").is_err());
        assert!(parse_cell("2147483647,0,0").is_err());
        assert!(parse_cell("16384,0,0").is_err());
        assert!(parse_cell("-1,0,0").is_err());
        assert_eq!(parse_cell("16383,16383,3").unwrap(), Cell::new(16383, 16383, 3));
    }

    #[test]
    fn test_validate_probability() {
        assert_eq!(validate_probability(0.25), 0.25);
        assert_eq!(validate_probability(-1.0), 0.0);
        assert_eq!(validate_probability(3.0), 1.0);
    }
}
