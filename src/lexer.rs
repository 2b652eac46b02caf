/// Splits one source line into fields. Fields are separated by whitespace
/// and commas; `#` starts a comment running to the end of the line.
pub fn fields(line: &str) -> Vec<&str> {
    let code = match line.find('#') {
        Some(p) => &line[..p],
        None => line,
    };
    code.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|f| !f.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_commas_and_drops_comments() {
        assert_eq!(
            fields("loop:\tmrmovl 8(%ebp),%eax  # load"),
            vec!["loop:", "mrmovl", "8(%ebp)", "%eax"]
        );
        assert!(fields("   # only a comment").is_empty());
        assert_eq!(fields("addl %eax , %ebx"), vec!["addl", "%eax", "%ebx"]);
    }
}
