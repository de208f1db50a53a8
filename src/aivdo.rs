use crate::nmea::Sentence;

// AIS message type 1 is a fixed 168-bit frame, which armors to exactly
// 28 six-bit characters with zero fill bits.
const POSITION_REPORT_BITS: usize = 168;

/// Encodes an own-ship AIS position report (message type 1) as an
/// `!AIVDO` sentence.
///
/// Coordinates are in decimal degrees, speed in knots, course in degrees
/// true. `utc_second` is the seconds field of the fix time; values of 60
/// and above encode as "not available".
pub fn position_report(
    mmsi: u32,
    latitude: f64,
    longitude: f64,
    speed_knots: f64,
    course_deg: f64,
    utc_second: u32,
) -> Sentence {
    let mut bits = Vec::with_capacity(POSITION_REPORT_BITS);

    push_bits(&mut bits, 1, 6); // message type
    push_bits(&mut bits, 0, 2); // repeat indicator
    push_bits(&mut bits, u64::from(mmsi), 30);
    push_bits(&mut bits, 0, 4); // nav status: under way using engine
    push_bits(&mut bits, 128, 8); // rate of turn: not available

    let sog = if speed_knots < 102.3 {
        (speed_knots * 10.0).round() as u64
    } else {
        1023
    };
    push_bits(&mut bits, sog, 10);
    push_bits(&mut bits, 0, 1); // position accuracy

    // Coordinates in 1/600000 degree, two's complement
    push_signed(&mut bits, (longitude * 600_000.0).round() as i64, 28);
    push_signed(&mut bits, (latitude * 600_000.0).round() as i64, 27);

    let cog = if course_deg < 360.0 {
        (course_deg * 10.0).round() as u64
    } else {
        3600
    };
    push_bits(&mut bits, cog, 12);
    let heading = if course_deg < 360.0 {
        course_deg.round() as u64
    } else {
        511
    };
    push_bits(&mut bits, heading, 9);

    let timestamp = if utc_second < 60 { utc_second } else { 60 };
    push_bits(&mut bits, u64::from(timestamp), 6);

    push_bits(&mut bits, 0, 2); // maneuver indicator
    push_bits(&mut bits, 0, 3); // spare
    push_bits(&mut bits, 0, 1); // RAIM flag
    push_bits(&mut bits, 0, 19); // radio status

    debug_assert_eq!(bits.len(), POSITION_REPORT_BITS);

    Sentence::encapsulated(
        "AIVDO",
        vec![
            "1".to_string(),
            "1".to_string(),
            String::new(),
            String::new(),
            armor(&bits),
            "0".to_string(),
        ],
    )
}

fn push_bits(bits: &mut Vec<bool>, value: u64, width: usize) {
    for shift in (0..width).rev() {
        bits.push((value >> shift) & 1 == 1);
    }
}

fn push_signed(bits: &mut Vec<bool>, value: i64, width: usize) {
    push_bits(bits, (value & ((1 << width) - 1)) as u64, width);
}

// Six bits per character: add 48, and skip the gap above 87 so the payload
// stays inside the AIS transport character set.
fn armor(bits: &[bool]) -> String {
    bits.chunks(6)
        .map(|chunk| {
            let value = chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit));
            let mut ch = value + 48;
            if ch > 87 {
                ch += 8;
            }
            ch as char
        })
        .collect()
}
