#[cfg(test)]
mod fixture_tests {
    use crate::ieee_c37_118::commands::{CommandType, DATA_START};
    use crate::ieee_c37_118::common::{CodecError, FrameType};
    use crate::ieee_c37_118::frame::{Frame, Message, Parser};
    use crate::ieee_c37_118::phasors::notation::{Float, Int, PolarFloat, PolarInt, RectangularInt};
    use crate::ieee_c37_118::phasors::{Number, PhasorNotation};
    use crate::ieee_c37_118::units::{MeasurementType, NominalFrequency};
    use crate::ieee_c37_118::utils::{timestamp_ns, validate_checksum};

    use std::fs;
    use std::path::Path;

    // Helper function to read hex encoded test data files
    fn read_hex_file(file_name: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/test_data")
            .join(file_name);
        let content = fs::read_to_string(path)?;

        // Remove any whitespace and newlines
        let hex_string: String = content.chars().filter(|c| !c.is_whitespace()).collect();
        Ok(hex::decode(hex_string)?)
    }

    fn decode(parser: &mut Parser, file_name: &str) -> (Vec<u8>, Frame) {
        let buffer = read_hex_file(file_name).unwrap();
        validate_checksum(&buffer).unwrap();
        let frame = parser
            .deserialize(&buffer)
            .unwrap()
            .unwrap_or_else(|| panic!("{} should hold a complete frame", file_name));
        assert_eq!(frame.framesize as usize, buffer.len());
        (buffer, frame)
    }

    #[test]
    fn test_station1_config_then_data() {
        let mut parser = Parser::new();

        let (config_bytes, config_frame) = decode(&mut parser, "config2_station1.bin");
        assert_eq!(config_frame.frame_type(), FrameType::Config2);
        assert_eq!(config_frame.version, 1);
        assert_eq!(config_frame.idcode, 1);
        assert_eq!(config_frame.soc, 1_149_580_800);

        let config = parser.get_config().unwrap().clone();
        assert_eq!(config.time_base, 1_000_000);
        assert_eq!(config.data_rate, 30);
        assert_eq!(config.pmus.len(), 1);
        assert_eq!(config.pmus[0].stn, "STATION1");
        assert_eq!(config.pmus[0].format, 0x0000);
        assert_eq!(config.pmus[0].phinfo[0].nam, "VA");
        assert_eq!(config.pmus[0].phasor_units()[0].scale_factor, 915_527);

        let (data_bytes, data_frame) = decode(&mut parser, "data_station1.bin");
        assert_eq!(data_frame.fracsec, 16_817);
        let data = match &data_frame.message {
            Some(Message::Data(data)) => data,
            other => panic!("expected a data frame, got {:?}", other),
        };
        let pmu = &data.pmus[0];
        assert_eq!(pmu.stat, 0);
        assert_eq!(pmu.phasor[0].get::<RectangularInt>().unwrap(), (1000, -500));
        assert_eq!(pmu.freq.get::<Int>().unwrap(), 5000);
        assert_eq!(pmu.dfreq, Number::Int(0));
        assert!(pmu.analog.is_empty());
        assert!(pmu.digital.is_empty());

        // exact reproduction, CHK included
        assert_eq!(parser.serialize(&data_frame).unwrap(), data_bytes);
        assert_eq!(parser.serialize(&config_frame).unwrap(), config_bytes);
    }

    #[test]
    fn test_header_hello() {
        let mut parser = Parser::new();
        let (bytes, frame) = decode(&mut parser, "header_hello.bin");
        assert_eq!(frame.version, 0);
        match &frame.message {
            Some(Message::Header(header)) => assert_eq!(header.text(), "hello"),
            other => panic!("expected a header frame, got {:?}", other),
        }
        assert_eq!(parser.serialize(&frame).unwrap(), bytes);
    }

    #[test]
    fn test_command_frame() {
        let mut parser = Parser::new();
        let (bytes, frame) = decode(&mut parser, "cmd_start.bin");

        assert_eq!(frame.idcode, 7734);
        assert_eq!(frame.soc, 1_149_591_600);
        assert_eq!(frame.fracsec, 770_000);
        match &frame.message {
            Some(Message::Command(command)) => {
                assert_eq!(command.cmd, DATA_START);
                assert_eq!(command.command_type(), Some(CommandType::DataStart));
                assert!(command.ext.is_empty());
            }
            other => panic!("expected a command frame, got {:?}", other),
        }
        assert_eq!(parser.serialize(&frame).unwrap(), bytes);
    }

    #[test]
    fn test_two_pmu_config_pass_order() {
        let mut parser = Parser::new();
        let (bytes, frame) = decode(&mut parser, "config1_two_pmus.bin");
        assert_eq!(frame.frame_type(), FrameType::Config1);
        assert_eq!(frame.idcode, 99);

        let config = match &frame.message {
            Some(Message::Config1(config)) => config,
            other => panic!("expected a configuration frame 1, got {:?}", other),
        };
        assert_eq!(config.data_rate, -5);
        assert_eq!(config.pmus.len(), 2);

        let a = &config.pmus[0];
        assert_eq!(a.stn, "PMU A");
        assert_eq!(a.idcode, 10);
        assert_eq!(a.phasor_notation(), PhasorNotation::PolarFloat);
        let names: Vec<&str> = a.phinfo.iter().map(|c| c.nam.as_str()).collect();
        assert_eq!(names, ["VA", "VB"]);
        assert_eq!(a.aninfo[0].nam, "AN1");
        assert_eq!(a.aninfo[0].unit, 1);
        assert_eq!(
            a.analog_units()[0].measurement_type,
            MeasurementType::SinglePointOnWave
        );
        assert!(a.dginfo.is_empty());
        assert_eq!(a.nominal_frequency(), NominalFrequency::Hz50);
        assert_eq!(a.cfgcnt, 3);

        let b = &config.pmus[1];
        assert_eq!(b.stn, "PMU B");
        assert_eq!(b.idcode, 20);
        assert_eq!(b.phasor_notation(), PhasorNotation::PolarInt);
        assert_eq!(b.phinfo[0].nam, "IA");
        assert!(b.phasor_units()[0].is_current);
        assert_eq!(b.phasor_units()[0].scale_factor, 45_776);
        assert!(b.aninfo.is_empty());
        assert_eq!(b.dginfo.len(), 1);
        assert_eq!(b.dginfo[0].nam[0], "BIT00");
        assert_eq!(b.dginfo[0].nam[15], "BIT15");
        assert_eq!(b.digital_units()[0].valid_inputs, 0xFFFF);
        assert_eq!(b.nominal_frequency(), NominalFrequency::Hz60);
        assert_eq!(b.cfgcnt, 7);

        assert_eq!(config.find_pmu(20), Some(b));
        assert_eq!(parser.get_config(), Some(&config.0));
        assert_eq!(parser.serialize(&frame).unwrap(), bytes);
    }

    #[test]
    fn test_two_pmu_data() {
        let mut parser = Parser::new();
        decode(&mut parser, "config1_two_pmus.bin");
        let (bytes, frame) = decode(&mut parser, "data_two_pmus.bin");
        assert_eq!(
            parser.get_config().unwrap().data_frame_size(),
            bytes.len()
        );

        let data = match &frame.message {
            Some(Message::Data(data)) => data,
            other => panic!("expected a data frame, got {:?}", other),
        };
        assert_eq!(data.pmus.len(), 2);

        let a = &data.pmus[0];
        assert_eq!(a.phasor[0].get::<PolarFloat>().unwrap(), (230.0, 0.5));
        assert_eq!(a.phasor[1].get::<PolarFloat>().unwrap(), (231.0, -2.0));
        assert_eq!(a.freq.get::<Float>().unwrap(), 50.01);
        assert_eq!(a.dfreq.to_float(), -0.25);
        assert_eq!(a.analog[0].get::<Float>().unwrap(), 12.5);

        let b = &data.pmus[1];
        assert_eq!(b.stat, 0x0800);
        assert_eq!(b.phasor[0].get::<PolarInt>().unwrap(), (1200, -15708));
        assert_eq!(b.freq, Number::Int(-120));
        assert_eq!(b.dfreq, Number::Int(3));
        assert_eq!(b.digital, vec![0xA5A5]);

        let time_base = parser.get_config().unwrap().time_base;
        assert_eq!(
            timestamp_ns(frame.soc, frame.fracsec, time_base),
            1_149_580_801_500_000_000
        );

        assert_eq!(parser.serialize(&frame).unwrap(), bytes);
    }

    #[test]
    fn test_data_before_config_has_no_message() {
        let mut parser = Parser::new();
        let (_, frame) = decode(&mut parser, "data_station1.bin");
        assert_eq!(frame.message, None);
        assert_eq!(frame.idcode, 1);
        assert_eq!(parser.serialize(&frame), Err(CodecError::MissingMessage));
    }

    #[test]
    fn test_parse_concatenated_stream() {
        let files = [
            "config2_station1.bin",
            "data_station1.bin",
            "header_hello.bin",
            "cmd_start.bin",
            "data_station1.bin",
        ];
        let stream: Vec<u8> = files
            .iter()
            .flat_map(|file| read_hex_file(file).unwrap())
            .collect();

        let mut parser = Parser::new();
        let mut offset = 0;
        let mut frame_types = Vec::new();
        while let Some(frame) = parser.deserialize(&stream[offset..]).unwrap() {
            offset += frame.framesize as usize;
            frame_types.push(frame.frame_type());
        }
        assert_eq!(offset, stream.len());
        assert_eq!(
            frame_types,
            [
                FrameType::Config2,
                FrameType::Data,
                FrameType::Header,
                FrameType::Command,
                FrameType::Data
            ]
        );
    }

    #[test]
    fn test_fixture_crc_corruption() {
        let mut buffer = read_hex_file("config1_two_pmus.bin").unwrap();
        // PHNMR of the first PMU
        buffer[20 + 16 + 4] ^= 0x80;

        let mut parser = Parser::new();
        assert!(matches!(
            parser.deserialize(&buffer),
            Err(CodecError::ChecksumMismatch { .. })
        ));
        assert!(parser.get_config().is_none());
    }
}
