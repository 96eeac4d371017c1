use crate::error::SomxResult;
use std::{
    fmt::{Binary, Display},
    path::Path,
    sync::Once,
};

pub type Result<T> = SomxResult<T>;

#[allow(unused)]
static INIT_LOG: Once = Once::new();

#[allow(unused)]
pub fn init_logger() {
    INIT_LOG.call_once(|| {
        env_logger::builder()
            .filter_level(log::LevelFilter::Trace)
            .is_test(true)
            .init();
    });
}

pub fn handle_error_and_exit(err: impl Display) -> ! {
    log::error!("{err}");
    std::process::exit(1);
}

pub fn try_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(crate::somx_error!(
            "Path/File does not exist: {}",
            path.display()
        ));
    }
    Ok(())
}

pub fn format_number_with_commas<T>(n: T) -> String
where
    T: Display + Binary,
{
    let s = n.to_string();
    let (sign, digits) = s.strip_prefix('-').map_or(("", s.as_str()), |d| ("-", d));
    if digits.len() <= 3 {
        return s;
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + sign.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}")
}
