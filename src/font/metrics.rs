//! Advance widths for the standard Helvetica faces, in 1/1000 em, taken
//! from the Adobe Core 14 AFM files. Printable ASCII is tabulated; Latin-1
//! letters with diacritics share their base letter's advance.

/// Width table for one standard font.
pub struct StandardFontMetrics {
    /// Advances for U+0020..=U+007E.
    ascii: [u16; 95],
    ordfeminine: u16,
    ordmasculine: u16,
    default_width: u16,
}

pub static HELVETICA: StandardFontMetrics = StandardFontMetrics {
    ascii: [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
        278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
        278, 278, 278, 469, 556, 333, // '['..'`'
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
        334, 260, 334, 584, // '{'..'~'
    ],
    ordfeminine: 370,
    ordmasculine: 365,
    default_width: 556,
};

pub static HELVETICA_BOLD: StandardFontMetrics = StandardFontMetrics {
    ascii: [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
        333, 333, 584, 584, 584, 611, 975, // ':'..'@'
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
        333, 278, 333, 584, 556, 333, // '['..'`'
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
        389, 280, 389, 584, // '{'..'~'
    ],
    ordfeminine: 370,
    ordmasculine: 365,
    default_width: 556,
};

impl StandardFontMetrics {
    /// Advance width of `ch` in 1/1000 em.
    pub fn advance(&self, ch: char) -> u16 {
        match ch {
            ' '..='~' => self.ascii[ch as usize - 0x20],
            '\u{a0}' => self.ascii[0],
            'ª' => self.ordfeminine,
            'º' => self.ordmasculine,
            _ => match base_letter(ch) {
                Some(base) => self.ascii[base as usize - 0x20],
                None => self.default_width,
            },
        }
    }

    /// Width of a single character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.advance(ch) as f64 / 1000.0 * font_size
    }

    /// Width of a string in points.
    pub fn measure_string(&self, text: &str, font_size: f64, letter_spacing: f64) -> f64 {
        text.chars()
            .map(|ch| self.char_width(ch, font_size) + letter_spacing)
            .sum()
    }
}

/// The unaccented ASCII letter for a Latin-1 letter with a diacritic.
fn base_letter(ch: char) -> Option<char> {
    let base = match ch {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    };
    Some(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accented_letters_match_base() {
        assert_eq!(HELVETICA.advance('ã'), HELVETICA.advance('a'));
        assert_eq!(HELVETICA.advance('Ç'), HELVETICA.advance('C'));
        assert_eq!(HELVETICA_BOLD.advance('é'), HELVETICA_BOLD.advance('e'));
    }

    #[test]
    fn table_lookups() {
        assert_eq!(HELVETICA.advance('A'), 667);
        assert_eq!(HELVETICA.advance('i'), 222);
        assert_eq!(HELVETICA.advance('~'), 584);
        assert_eq!(HELVETICA_BOLD.advance('A'), 722);
        assert_eq!(HELVETICA_BOLD.advance('m'), 889);
    }

    #[test]
    fn unknown_chars_use_default() {
        assert_eq!(HELVETICA.advance('中'), 556);
    }
}
