/// XOR of every character between the leading delimiter and the checksum
/// delimiter. Rendered on the wire as two uppercase hex digits.
pub fn checksum(body: &str) -> u8 {
    body.bytes().fold(0, |acc, b| acc ^ b)
}

/// Checks a received line against its own checksum field.
///
/// Accepts an optional trailing CRLF and either the `$` or `!` delimiter.
pub fn verify_checksum(line: &str) -> bool {
    let line = line.trim_end_matches(['\r', '\n']);
    let body = match line.strip_prefix('$').or_else(|| line.strip_prefix('!')) {
        Some(body) => body,
        None => return false,
    };
    match body.rsplit_once('*') {
        Some((body, given)) => u8::from_str_radix(given, 16)
            .map(|given| given == checksum(body))
            .unwrap_or(false),
        None => false,
    }
}

/// One line of the feed protocol. The checksum is computed from the body at
/// render time, so an emitted sentence is always checksum-valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    delimiter: char,
    identifier: String,
    fields: Vec<String>,
}

impl Sentence {
    /// A `$`-delimited parametric sentence (GGA, GSA, RMC, ...).
    pub fn parametric(identifier: &str, fields: Vec<String>) -> Self {
        Self {
            delimiter: '$',
            identifier: identifier.to_string(),
            fields,
        }
    }

    /// A `!`-delimited encapsulated sentence (AIVDO/AIVDM).
    pub fn encapsulated(identifier: &str, fields: Vec<String>) -> Self {
        Self {
            delimiter: '!',
            identifier: identifier.to_string(),
            fields,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn checksum(&self) -> u8 {
        checksum(&self.body())
    }

    // Everything between the delimiter and the `*`.
    fn body(&self) -> String {
        let mut body = self.identifier.clone();
        for field in &self.fields {
            body.push(',');
            body.push_str(field);
        }
        body
    }

    /// The complete wire form, CRLF-terminated.
    pub fn render(&self) -> String {
        let body = self.body();
        format!("{}{}*{:02X}\r\n", self.delimiter, body, checksum(&body))
    }
}

/// An ordered group of sentences describing one simulated instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceBlock {
    sentences: Vec<Sentence>,
}

impl SentenceBlock {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn to_wire(&self) -> String {
        self.sentences.iter().map(Sentence::render).collect()
    }
}

/// Formats a latitude in decimal degrees as NMEA `ddmm.mmm` plus hemisphere.
pub fn format_latitude(latitude: f64) -> (String, &'static str) {
    let hemisphere = if latitude < 0.0 { "S" } else { "N" };
    let abs = latitude.abs();
    let degrees = abs.trunc() as u32;
    let minutes = (abs - abs.trunc()) * 60.0;
    (format!("{:02}{:06.3}", degrees, minutes), hemisphere)
}

/// Formats a longitude in decimal degrees as NMEA `dddmm.mmm` plus hemisphere.
pub fn format_longitude(longitude: f64) -> (String, &'static str) {
    let hemisphere = if longitude < 0.0 { "W" } else { "E" };
    let abs = longitude.abs();
    let degrees = abs.trunc() as u32;
    let minutes = (abs - abs.trunc()) * 60.0;
    (format!("{:03}{:06.3}", degrees, minutes), hemisphere)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_matches_known_sentences() {
        assert_eq!(
            checksum("GPGGA,194546.127,5231.525,N,01323.391,E,1,12,1.0,0.0,M,0.0,M,,"),
            0x6E
        );
        assert_eq!(
            checksum("GPGSA,A,3,01,02,03,04,05,06,07,08,09,10,11,12,1.0,1.0,1.0"),
            0x30
        );
        assert_eq!(
            checksum("GPRMC,194546.127,A,5231.525,N,01323.391,E,2372.1,093.7,200220,000.0,W"),
            0x40
        );
        assert_eq!(checksum("AIVDO,1,1,,,15Mw0k0001q>Ac6@lk@Gio6005H`,0"), 0x37);
    }

    #[test]
    fn render_appends_checksum_and_crlf() {
        let sentence = Sentence::parametric(
            "GPGSA",
            "A,3,01,02,03,04,05,06,07,08,09,10,11,12,1.0,1.0,1.0"
                .split(',')
                .map(str::to_string)
                .collect(),
        );
        assert_eq!(
            sentence.render(),
            "$GPGSA,A,3,01,02,03,04,05,06,07,08,09,10,11,12,1.0,1.0,1.0*30\r\n"
        );
    }

    #[test]
    fn verify_accepts_valid_and_rejects_corrupted() {
        let line = "$GPRMC,194546.127,A,5231.525,N,01323.391,E,2372.1,093.7,200220,000.0,W*40\r\n";
        assert!(verify_checksum(line));
        assert!(verify_checksum(line.trim_end()));
        assert!(verify_checksum("!AIVDO,1,1,,,15Mw0k0001q>Ac6@lk@Gio6005H`,0*37"));

        assert!(!verify_checksum(&line.replace("5231.525", "5231.526")));
        assert!(!verify_checksum("$GPRMC,no,checksum,field"));
        assert!(!verify_checksum("GPRMC,missing,delimiter*00"));
        assert!(!verify_checksum("$GPRMC,bad,hex*ZZ"));
    }

    #[test]
    fn latitude_and_longitude_formatting() {
        assert_eq!(
            format_latitude(52.0 + 31.525 / 60.0),
            ("5231.525".to_string(), "N")
        );
        assert_eq!(
            format_longitude(13.0 + 23.391 / 60.0),
            ("01323.391".to_string(), "E")
        );
        assert_eq!(
            format_latitude(-(34.0 + 4.704 / 60.0)),
            ("3404.704".to_string(), "S")
        );
        assert_eq!(
            format_longitude(-(70.0 + 44.397 / 60.0)),
            ("07044.397".to_string(), "W")
        );
    }

    #[test]
    fn block_concatenates_renders_in_order() {
        let block = SentenceBlock::new(vec![
            Sentence::parametric("GPGGA", vec!["1".into()]),
            Sentence::parametric("GPRMC", vec!["2".into()]),
        ]);
        let wire = block.to_wire();
        assert_eq!(block.len(), 2);
        assert_eq!(wire.matches("\r\n").count(), 2);
        assert!(wire.starts_with("$GPGGA,1*"));
        let second = wire.split("\r\n").nth(1).unwrap();
        assert!(second.starts_with("$GPRMC,2*"));
    }
}
