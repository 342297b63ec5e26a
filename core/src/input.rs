//! Parsing of numeric text typed into the form.
//!
//! Inputs are read the way a browser number field is usually read: leading
//! whitespace is skipped (any Unicode space, no-break space included), the
//! longest leading float literal is taken and anything after it is ignored,
//! so `"1.5 m"` reads as `1.5`.

use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, digit1, one_of},
    combinator::{opt, recognize},
    sequence::preceded,
    IResult, Parser,
};

/// Parse the leading decimal number of `input`.
///
/// Returns `None` when there is no leading literal or the value is not finite.
pub fn parse_number(input: &str) -> Option<f64> {
    let (_, literal) = number_prefix(input).ok()?;
    let value: f64 = literal.parse().ok()?;
    value.is_finite().then_some(value)
}

// Like `recognize_float`, but a dangling exponent marker ends the literal
// instead of failing it: "3em" reads as 3.
fn number_prefix(input: &str) -> IResult<&str, &str> {
    preceded(
        take_while(|c: char| c.is_whitespace()),
        recognize((
            opt(one_of("+-")),
            alt((
                recognize((digit1, opt((char('.'), opt(digit1))))),
                recognize((char('.'), digit1)),
            )),
            opt((one_of("eE"), opt(one_of("+-")), digit1)),
        )),
    )
    .parse(input)
}
