//! Link activation and navigation.

use anyhow::{Context, Result};
use log::debug;
use std::io::{self, Write};

use super::RealRuntime;

pub(crate) fn print_navigation<W: Write>(verb: &str, target: &str, output: &mut W) -> Result<()> {
    writeln!(output, "{} {}", verb, target)?;
    output.flush()?;
    Ok(())
}

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn activate_link_impl(&self, href: &str) -> Result<()> {
        if !self.open_links {
            return print_navigation("open", href, &mut io::stdout());
        }
        debug!("Activating link {}", href);
        open::that_detached(href).with_context(|| format!("Failed to open link {}", href))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn navigate_impl(&self, url: &str) -> Result<()> {
        if !self.open_links {
            return print_navigation("navigate", url, &mut io::stdout());
        }
        debug!("Navigating to {}", url);
        open::that_detached(url).with_context(|| format!("Failed to navigate to {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::print_navigation;
    use crate::runtime::{RealRuntime, Runtime};

    #[test]
    fn test_print_navigation_format() {
        let mut output = Vec::new();
        print_navigation("open", "fb://", &mut output).unwrap();
        print_navigation("navigate", "itms://apps.apple.com/app/id1", &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "open fb://\nnavigate itms://apps.apple.com/app/id1\n"
        );
    }

    #[test]
    fn test_print_only_runtime_does_not_fail() {
        let runtime = RealRuntime::new("iPhone").print_only();
        runtime.activate_link("fb://").unwrap();
        runtime.navigate("itms://example").unwrap();
    }
}
