#[cfg(test)]
mod tests {
    use recipe_units::conversion_table::ConversionTable;
    use recipe_units::errors::AppError;
    use recipe_units::formatting::float_dot_zero;
    use recipe_units::units::Unit;
    use recipe_units::{parse_quantity, Amount, Quantity, UnitConverter};
    use serde_json::json;

    fn create_converter() -> UnitConverter {
        UnitConverter::new()
    }

    #[test]
    fn test_convert_ing_known_values() {
        let converter = create_converter();

        let grams = converter.convert_units_ing("300", "g");
        assert_eq!(grams.value(), Some(10.56));
        assert_eq!(grams.unit, "oz");

        let kilos = converter.convert_units_ing("2,7", "kg");
        assert_eq!(kilos.value(), Some(5.95));
        assert_eq!(kilos.unit, "lb");

        let liters = converter.convert_units_ing("1.5", "litri");
        assert_eq!(liters.value(), Some(1.58));
        assert_eq!(liters.unit, "quart");

        let untouched = converter.convert_units_ing("(5 o 6", "n/a");
        assert_eq!(untouched.amount, Amount::Text("(5 o 6".to_string()));
        assert_eq!(untouched.unit, "n/a");
    }

    #[test]
    fn test_convert_ing_more_units() {
        let converter = create_converter();

        let milliliters = converter.convert_units_ing("250", "ml");
        assert_eq!(milliliters.value(), Some(1.06));
        assert_eq!(milliliters.unit, "cup");

        let half_liter = converter.convert_units_ing("0,5", "l");
        assert_eq!(half_liter.value(), Some(2.11));
        assert_eq!(half_liter.unit, "cup");

        let kilo_of_grams = converter.convert_units_ing("1000", "grammi");
        assert_eq!(kilo_of_grams.value(), Some(2.2));
        assert_eq!(kilo_of_grams.unit, "lb");

        let centimeters = converter.convert_units_ing("30", "cm");
        assert_eq!(centimeters.value(), Some(11.81));
        assert_eq!(centimeters.unit, "inches");

        let long = converter.convert_units_ing("50", "cm");
        assert_eq!(long.amount, Amount::Mixed("1'7.68''".to_string()));
        assert_eq!(long.unit, "feet and inches");

        let oven = converter.convert_units_ing("180", "°C");
        assert_eq!(oven.value(), Some(356.0));
        assert_eq!(oven.unit, "° F");
    }

    #[test]
    fn test_not_applicable_unit_is_identity() {
        let converter = create_converter();
        for text in ["300", "2,7", "1/2", "1.500", "5 - 6", "15-20", "qualche", "n/a"] {
            let converted = converter.convert_units_ing(text, "n/a");
            assert_eq!(converted.amount, Amount::Text(text.to_string()));
            assert_eq!(converted.amount.to_string(), text);
            assert_eq!(converted.unit, "n/a");
        }
    }

    #[test]
    fn test_not_applicable_quantity_is_identity() {
        let converter = create_converter();
        for unit in ["g", "kg", "litri", "cm", "cucchiaio", "n/a"] {
            let converted = converter.convert_units_ing("n/a", unit);
            assert_eq!(converted.amount, Amount::Text("n/a".to_string()));
            assert_eq!(converted.unit, unit);
        }
    }

    #[test]
    fn test_inverse_scale_reproduces_original() {
        let converter = create_converter();
        let table = ConversionTable::default();
        let cases = [
            ("1,5", Unit::Kilogram, "kg"),
            ("2,7", Unit::Kilogram, "kg"),
            ("10", Unit::Kilogram, "kg"),
            ("5", Unit::Centimeter, "cm"),
            ("25", Unit::Centimeter, "cm"),
            ("100", Unit::Milliliter, "ml"),
            ("2", Unit::Deciliter, "dl"),
        ];

        for (quantity, unit, token) in cases {
            let converted = converter.convert_units_ing(quantity, token);
            let value = converted
                .value()
                .unwrap_or_else(|| panic!("{} {} should convert to a number", quantity, token));
            let scale = table.rule(unit).unwrap().scale;
            let original = match parse_quantity(quantity) {
                Quantity::Numeric(original) => original,
                other => panic!("unexpected quantity {:?}", other),
            };
            let tolerance = scale.invert(0.005).abs() + 1e-9;
            assert!(
                (scale.invert(value) - original).abs() <= tolerance,
                "{} {} -> {} does not invert within {}",
                quantity,
                token,
                value,
                tolerance
            );
        }
    }

    #[test]
    fn test_simplify_units_known_values() {
        let converter = create_converter();

        let ounces = converter.simplify_units(0.4, "lb");
        assert_eq!(ounces.value(), Some(6.4));
        assert_eq!(ounces.unit, "oz");

        let cups = converter.simplify_units(10.0, "fl oz");
        assert_eq!(cups.value(), Some(1.25));
        assert_eq!(cups.unit, "cup");

        let quarts = converter.simplify_units(50.0, "fl oz");
        assert_eq!(quarts.value(), Some(1.56));
        assert_eq!(quarts.unit, "quart");

        let feet_and_inches = converter.simplify_units(20.0, "inches");
        assert_eq!(feet_and_inches.amount, Amount::Mixed("1'8''".to_string()));
        assert_eq!(feet_and_inches.unit, "feet and inches");

        let feet = converter.simplify_units(12.0, "inches");
        assert_eq!(feet.amount, Amount::Mixed("1'".to_string()));
        assert_eq!(feet.unit, "feet");
    }

    #[test]
    fn test_simplify_boundary_is_strict() {
        let converter = create_converter();

        let eight = converter.simplify_units(8.0, "fl oz");
        assert_eq!(eight.value(), Some(8.0));
        assert_eq!(eight.unit, "fl oz");

        let just_over = converter.simplify_units(8.08, "fl oz");
        assert_eq!(just_over.value(), Some(1.01));
        assert_eq!(just_over.unit, "cup");
    }

    #[test]
    fn test_unknown_unit_keeps_quantity_text() {
        let converter = create_converter();
        for (quantity, unit) in [("1/2", "cucchiaino"), ("2,7", "tazze"), ("5 - 6", "fette")] {
            let converted = converter.convert_units_ing(quantity, unit);
            assert_eq!(converted.amount.to_string(), quantity);
            assert_eq!(converted.amount.to_json(), json!(quantity));
            assert_eq!(converted.unit, unit);
        }
    }

    #[test]
    fn test_simplify_unknown_label_is_unchanged() {
        let converter = create_converter();
        let converted = converter.simplify_units(3.0, "pizzichi");
        assert_eq!(converted.value(), Some(3.0));
        assert_eq!(converted.unit, "pizzichi");
    }

    #[test]
    fn test_float_dot_zero_known_values() {
        assert!(float_dot_zero(&json!(4.0)));
        assert!(!float_dot_zero(&json!(0.4)));
        assert!(!float_dot_zero(&json!("yogurt")));
        assert!(!float_dot_zero(&json!(0)));
        assert!(!float_dot_zero(&json!([])));
    }

    #[test]
    fn test_bad_inputs_are_type_mismatches() {
        let converter = create_converter();

        assert!(matches!(
            converter.convert_prep_value(&json!(5)),
            Err(AppError::TypeMismatch(_))
        ));
        assert!(matches!(
            converter.convert_ing_value(&json!([]), &json!("g")),
            Err(AppError::TypeMismatch(_))
        ));
        assert!(matches!(
            converter.convert_ing_value(&json!("300"), &json!(["g"])),
            Err(AppError::TypeMismatch(_))
        ));
        assert!(matches!(
            converter.convert_name_value(&json!(5)),
            Err(AppError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_value_inputs_that_are_accepted() {
        let converter = create_converter();

        let from_number = converter.convert_ing_value(&json!(2.7), &json!("kg")).unwrap();
        assert_eq!(from_number.value(), Some(5.95));

        let from_null = converter.convert_ing_value(&json!(null), &json!(null)).unwrap();
        assert_eq!(from_null.amount, Amount::Quantity(Quantity::not_applicable()));
        assert_eq!(from_null.unit, "n/a");

        assert_eq!(
            converter.convert_prep_value(&json!("300g")).unwrap(),
            "10.56oz"
        );
    }

    #[test]
    fn test_converter_is_shareable_across_threads() {
        let converter = std::sync::Arc::new(create_converter());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let converter = converter.clone();
                std::thread::spawn(move || converter.convert_units_prep("300g"))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "10.56oz");
        }
    }
}
