use oui_lookup::{LookupEngine, LookupError, MacAddress, VendorRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Terse,
    Normal,
    Verbose,
}

/// Resolve every address independently; a failing address never stops the
/// batch.
pub async fn run(
    engine: &LookupEngine,
    addresses: &[String],
    local_only: bool,
    mode: OutputMode,
) {
    for input in addresses {
        let mac = normalize_address(input);
        let result = if local_only {
            engine.lookup_local(&mac).await
        } else {
            engine.lookup(&mac).await
        };

        match format_outcome(input, &mac, result, mode) {
            Ok(line) => println!("{}", line),
            Err(line) => eprintln!("{}", line),
        }
    }
}

/// Accept a few shorthand separators on top of what the parser takes
pub fn normalize_address(input: &str) -> String {
    input
        .trim()
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(":")
}

/// Render one lookup result. `Err` carries lines meant for stderr.
fn format_outcome(
    input: &str,
    mac: &str,
    result: Result<VendorRecord, LookupError>,
    mode: OutputMode,
) -> Result<String, String> {
    let label = MacAddress::parse(mac)
        .map(|m| m.to_string())
        .unwrap_or_else(|_| input.to_string());

    match result {
        Ok(record) => Ok(format_record(&label, &record, mode)),
        Err(LookupError::NotFound(_)) => Ok(format!("{}: vendor not found", label)),
        Err(LookupError::LocallyAdministered(_)) => Ok(format!(
            "{}: locally administered address, no vendor assigned",
            label
        )),
        Err(e) => Err(format!("{}: error: {}", label, e)),
    }
}

fn format_record(label: &str, record: &VendorRecord, mode: OutputMode) -> String {
    match mode {
        OutputMode::Terse => record.company_name().to_string(),
        OutputMode::Normal => format!("{:<20} {}", label, record.company_name()),
        OutputMode::Verbose => {
            let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
            let mut out = format!("{}\n", label);
            out.push_str(&format!("  {:<10} {}\n", "OUI:", record.prefix()));
            out.push_str(&format!("  {:<10} {}\n", "Vendor:", record.company_name()));
            out.push_str(&format!("  {:<10} {}\n", "Address:", or_dash(record.company_address())));
            out.push_str(&format!("  {:<10} {}\n", "Country:", or_dash(record.country_code())));
            out.push_str(&format!("  {:<10} {}\n", "Block:", record.block_type()));
            out.push_str(&format!(
                "  {:<10} {}\n",
                "Private:",
                if record.is_private() { "yes" } else { "no" }
            ));
            out.push_str(&format!("  {:<10} {}", "Updated:", or_dash(record.updated())));
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oui_lookup::Config;

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address(" 00:11:22:33:44:55 "), "00:11:22:33:44:55");
        assert_eq!(normalize_address("00 11 22 33 44 55"), "00:11:22:33:44:55");
        assert_eq!(normalize_address("00_11_22_33_44_55"), "00:11:22:33:44:55");
        assert_eq!(normalize_address("001122334455"), "001122334455");
    }

    #[test]
    fn test_format_found() {
        let record = VendorRecord::from_vendor_name("001122", "Test Co");

        let mac = "00-11-22-33-44-55";

        let line = format_outcome(mac, mac, Ok(record.clone()), OutputMode::Terse);
        assert_eq!(line, Ok("Test Co".to_string()));

        let line = format_outcome(mac, mac, Ok(record.clone()), OutputMode::Normal).unwrap();
        assert!(line.starts_with("00:11:22:33:44:55"));
        assert!(line.ends_with("Test Co"));

        let block = format_outcome(mac, mac, Ok(record), OutputMode::Verbose).unwrap();
        assert!(block.starts_with("00:11:22:33:44:55\n"));
        assert!(block.contains("Vendor:    Test Co"));
        assert!(block.contains("Country:   -"));
        assert!(block.contains("Block:     MA-L"));
    }

    #[test]
    fn test_format_failures() {
        let mac = "02:00:00:00:00:00";
        let line = format_outcome(
            mac,
            mac,
            Err(LookupError::LocallyAdministered(mac.to_string())),
            OutputMode::Normal,
        );
        assert_eq!(
            line,
            Ok("02:00:00:00:00:00: locally administered address, no vendor assigned".to_string())
        );

        let line = format_outcome(
            "00:11:22:33:44:55",
            "00:11:22:33:44:55",
            Err(LookupError::NotFound("00:11:22:33:44:55".to_string())),
            OutputMode::Normal,
        );
        assert_eq!(line, Ok("00:11:22:33:44:55: vendor not found".to_string()));

        let line = format_outcome(
            "zz",
            "zz",
            Err(LookupError::InvalidMacAddress("zz".to_string())),
            OutputMode::Normal,
        );
        assert_eq!(line, Err("zz: error: invalid MAC address: zz".to_string()));
    }

    #[tokio::test]
    async fn test_batch_continues_after_bad_address() {
        let dir = tempfile::tempdir().unwrap();
        let registry = dir.path().join("oui.txt");
        std::fs::write(&registry, "30-11-22     (hex)\t\tSome Inc\n").unwrap();

        let mut config = Config::default();
        config.cache_path = dir.path().join("vendors.json");
        config.registry.url = format!("file://{}", registry.display());

        let engine = LookupEngine::new(&config).unwrap();
        engine.update_database(None).await.unwrap();

        let addresses = vec![
            "not-a-mac".to_string(),
            "02:00:00:00:00:00".to_string(),
            "30 11 22 00 00 00".to_string(),
        ];
        run(&engine, &addresses, true, OutputMode::Normal).await;

        let record = engine.lookup_local("30:11:22:00:00:00").await.unwrap();
        assert_eq!(record.company_name(), "Some Inc");
    }
}
