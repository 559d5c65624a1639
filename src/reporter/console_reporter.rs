//! Console-based event reporter.

use std::io::{self, Write};
use std::time::Duration;

use macaddr::MacAddr6;

use crate::domain::{Classification, WindowSummary};
use crate::reporter::EventReporter;

/// Marker printed when a frame carries no decodable network address.
pub const UNKNOWN: &str = "unknown";

/// Reports broadcast activity as lines on a writer (stdout by default).
pub struct ConsoleReporter<W: Write + Send = io::Stdout> {
    out: W,
    /// Whether to include the measured rate in window lines
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a reporter that prints to stdout.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    /// Create a reporter that prints to `out`.
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            verbose: false,
        }
    }

    /// Enable or disable verbose output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn format_packet(&self, packet: &Classification) -> String {
        let mac = packet
            .source_mac
            .map(|mac| format_mac(&mac))
            .unwrap_or_else(|| UNKNOWN.to_string());
        let ip = packet
            .source_ip
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());

        format!("[BROADCAST] MAC: {} | IP: {}", mac, ip)
    }

    fn format_window(&self, summary: &WindowSummary) -> String {
        let mut output = format!(
            "[WINDOW {}s] broadcast frames: {}",
            summary.window_length.as_secs(),
            summary.count
        );

        if self.verbose {
            output.push_str(&format!(
                " | elapsed: {:.3}s | rate: {:.2}/s",
                summary.elapsed.as_secs_f64(),
                summary.rate()
            ));
        }

        output
    }

    fn line(&mut self, line: &str) {
        let _ = writeln!(self.out, "{}", line);
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> EventReporter for ConsoleReporter<W> {
    fn on_start(&mut self, interface: &str, window: Duration) {
        self.line(&format!(
            "Monitoring broadcast traffic on interface: {} (window: {}s)",
            interface,
            window.as_secs()
        ));
        self.line("Press Ctrl+C to stop.\n");
    }

    fn report_packet(&mut self, packet: &Classification) {
        let output = self.format_packet(packet);
        self.line(&output);
    }

    fn report_window(&mut self, summary: &WindowSummary) {
        let output = self.format_window(summary);
        self.line(&output);
    }

    fn on_stop(&mut self) {
        self.line("\nStopping broadcast monitor.");
    }
}

/// Format a MAC address as lowercase colon-separated hex.
pub fn format_mac(mac: &MacAddr6) -> String {
    mac.as_bytes()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn reporter() -> ConsoleReporter<Vec<u8>> {
        ConsoleReporter::with_writer(Vec::new())
    }

    fn output(reporter: ConsoleReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    fn packet(ip: Option<IpAddr>) -> Classification {
        Classification {
            is_broadcast: true,
            source_mac: Some(MacAddr6::new(0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff)),
            source_ip: ip,
        }
    }

    #[test]
    fn test_format_mac() {
        let mac = MacAddr6::new(0x00, 0x1A, 0x2b, 0x3C, 0x4d, 0xFF);
        assert_eq!(format_mac(&mac), "00:1a:2b:3c:4d:ff");
    }

    #[test]
    fn test_packet_line_with_ip() {
        let mut reporter = reporter();
        reporter.report_packet(&packet(Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 5)))));

        assert_eq!(output(reporter), "[BROADCAST] MAC: aa:bb:cc:dd:ee:ff | IP: 192.168.1.5\n");
    }

    #[test]
    fn test_packet_line_without_ip_says_unknown() {
        let mut reporter = reporter();
        reporter.report_packet(&packet(None));

        assert_eq!(output(reporter), "[BROADCAST] MAC: aa:bb:cc:dd:ee:ff | IP: unknown\n");
    }

    #[test]
    fn test_window_line() {
        let mut reporter = reporter();
        reporter.report_window(&WindowSummary {
            count: 42,
            window_length: Duration::from_secs(5),
            elapsed: Duration::from_millis(5_020),
        });

        assert_eq!(output(reporter), "[WINDOW 5s] broadcast frames: 42\n");
    }

    #[test]
    fn test_verbose_window_line_includes_rate() {
        let mut reporter = reporter().with_verbose(true);
        reporter.report_window(&WindowSummary {
            count: 10,
            window_length: Duration::from_secs(5),
            elapsed: Duration::from_secs(5),
        });

        assert_eq!(
            output(reporter),
            "[WINDOW 5s] broadcast frames: 10 | elapsed: 5.000s | rate: 2.00/s\n"
        );
    }

    #[test]
    fn test_start_and_stop_lines() {
        let mut reporter = reporter();
        reporter.on_start("eth0", Duration::from_secs(5));
        reporter.on_stop();

        let text = output(reporter);
        assert!(text.starts_with("Monitoring broadcast traffic on interface: eth0 (window: 5s)\n"));
        assert!(text.ends_with("Stopping broadcast monitor.\n"));
    }
}
