//! Named-color lookup.
//!
//! CSS named colors plus a few extras, one entry per hex value, in table
//! order. Lookups pick the nearest entry by Euclidean RGB distance; on equal
//! distance the earlier entry wins.

use super::color::Rgb;

pub const COLOR_NAMES: &[(Rgb, &str)] = &[
    (Rgb::new(0x00, 0x00, 0x00), "Black"),
    (Rgb::new(0xff, 0xff, 0xff), "White"),
    (Rgb::new(0xff, 0x00, 0x00), "Red"),
    (Rgb::new(0x00, 0xff, 0x00), "Lime"),
    (Rgb::new(0x00, 0x00, 0xff), "Blue"),
    (Rgb::new(0xff, 0xff, 0x00), "Yellow"),
    (Rgb::new(0x00, 0xff, 0xff), "Cyan"),
    (Rgb::new(0xff, 0x00, 0xff), "Magenta"),
    (Rgb::new(0xc0, 0xc0, 0xc0), "Silver"),
    (Rgb::new(0x80, 0x80, 0x80), "Gray"),
    (Rgb::new(0x80, 0x00, 0x00), "Maroon"),
    (Rgb::new(0x80, 0x80, 0x00), "Olive"),
    (Rgb::new(0x00, 0x80, 0x00), "Green"),
    (Rgb::new(0x80, 0x00, 0x80), "Purple"),
    (Rgb::new(0x00, 0x80, 0x80), "Teal"),
    (Rgb::new(0x00, 0x00, 0x80), "Navy"),
    (Rgb::new(0xff, 0xa5, 0x00), "Orange"),
    (Rgb::new(0xff, 0x45, 0x00), "OrangeRed"),
    (Rgb::new(0xff, 0x63, 0x47), "Tomato"),
    (Rgb::new(0xff, 0x7f, 0x50), "Coral"),
    (Rgb::new(0xff, 0xd7, 0x00), "Gold"),
    (Rgb::new(0xad, 0xff, 0x2f), "GreenYellow"),
    (Rgb::new(0x7f, 0xff, 0x00), "Chartreuse"),
    (Rgb::new(0x00, 0xfa, 0x9a), "MediumSpringGreen"),
    (Rgb::new(0x00, 0xce, 0xd1), "DarkTurquoise"),
    (Rgb::new(0x1e, 0x90, 0xff), "DodgerBlue"),
    (Rgb::new(0x8a, 0x2b, 0xe2), "BlueViolet"),
    (Rgb::new(0x94, 0x00, 0xd3), "DarkViolet"),
    (Rgb::new(0xff, 0x14, 0x93), "DeepPink"),
    (Rgb::new(0xdc, 0x14, 0x3c), "Crimson"),
    (Rgb::new(0xf5, 0xf5, 0xdc), "Beige"),
    (Rgb::new(0xff, 0xe4, 0xc4), "Bisque"),
    (Rgb::new(0xfa, 0xeb, 0xd7), "AntiqueWhite"),
    (Rgb::new(0xd2, 0x69, 0x1e), "Chocolate"),
    (Rgb::new(0x8b, 0x45, 0x13), "SaddleBrown"),
    (Rgb::new(0xa5, 0x2a, 0x2a), "Brown"),
    (Rgb::new(0xde, 0xb8, 0x87), "BurlyWood"),
    (Rgb::new(0x5f, 0x9e, 0xa0), "CadetBlue"),
    (Rgb::new(0x64, 0x95, 0xed), "CornflowerBlue"),
    (Rgb::new(0xff, 0xf8, 0xdc), "Cornsilk"),
    (Rgb::new(0x00, 0x00, 0x8b), "DarkBlue"),
    (Rgb::new(0x00, 0x8b, 0x8b), "DarkCyan"),
    (Rgb::new(0xb8, 0x86, 0x0b), "DarkGoldenRod"),
    (Rgb::new(0xa9, 0xa9, 0xa9), "DarkGray"),
    (Rgb::new(0x00, 0x64, 0x00), "DarkGreen"),
    (Rgb::new(0xbd, 0xb7, 0x6b), "DarkKhaki"),
    (Rgb::new(0x8b, 0x00, 0x8b), "DarkMagenta"),
    (Rgb::new(0x55, 0x6b, 0x2f), "DarkOliveGreen"),
    (Rgb::new(0xff, 0x8c, 0x00), "DarkOrange"),
    (Rgb::new(0x99, 0x32, 0xcc), "DarkOrchid"),
    (Rgb::new(0x8b, 0x00, 0x00), "DarkRed"),
    (Rgb::new(0xe9, 0x96, 0x7a), "DarkSalmon"),
    (Rgb::new(0x8f, 0xbc, 0x8f), "DarkSeaGreen"),
    (Rgb::new(0x48, 0x3d, 0x8b), "DarkSlateBlue"),
    (Rgb::new(0x2f, 0x4f, 0x4f), "DarkSlateGray"),
    (Rgb::new(0x00, 0xbf, 0xff), "DeepSkyBlue"),
    (Rgb::new(0x69, 0x69, 0x69), "DimGray"),
    (Rgb::new(0xb2, 0x22, 0x22), "FireBrick"),
    (Rgb::new(0xff, 0xfa, 0xf0), "FloralWhite"),
    (Rgb::new(0x22, 0x8b, 0x22), "ForestGreen"),
    (Rgb::new(0xdc, 0xdc, 0xdc), "Gainsboro"),
    (Rgb::new(0xf8, 0xf8, 0xff), "GhostWhite"),
    (Rgb::new(0xda, 0xa5, 0x20), "GoldenRod"),
    (Rgb::new(0xf0, 0xff, 0xf0), "HoneyDew"),
    (Rgb::new(0xff, 0x69, 0xb4), "HotPink"),
    (Rgb::new(0xcd, 0x5c, 0x5c), "IndianRed"),
    (Rgb::new(0x4b, 0x00, 0x82), "Indigo"),
    (Rgb::new(0xff, 0xff, 0xf0), "Ivory"),
    (Rgb::new(0xf0, 0xe6, 0x8c), "Khaki"),
    (Rgb::new(0xe6, 0xe6, 0xfa), "Lavender"),
    (Rgb::new(0xff, 0xf0, 0xf5), "LavenderBlush"),
    (Rgb::new(0x7c, 0xfc, 0x00), "LawnGreen"),
    (Rgb::new(0xff, 0xfa, 0xcd), "LemonChiffon"),
    (Rgb::new(0xad, 0xd8, 0xe6), "LightBlue"),
    (Rgb::new(0xf0, 0x80, 0x80), "LightCoral"),
    (Rgb::new(0xe0, 0xff, 0xff), "LightCyan"),
    (Rgb::new(0xfa, 0xfa, 0xd2), "LightGoldenRodYellow"),
    (Rgb::new(0xd3, 0xd3, 0xd3), "LightGray"),
    (Rgb::new(0x90, 0xee, 0x90), "LightGreen"),
    (Rgb::new(0xff, 0xb6, 0xc1), "LightPink"),
    (Rgb::new(0xff, 0xa0, 0x7a), "LightSalmon"),
    (Rgb::new(0x20, 0xb2, 0xaa), "LightSeaGreen"),
    (Rgb::new(0x87, 0xce, 0xfa), "LightSkyBlue"),
    (Rgb::new(0x77, 0x88, 0x99), "LightSlateGray"),
    (Rgb::new(0xb0, 0xc4, 0xde), "LightSteelBlue"),
    (Rgb::new(0xff, 0xff, 0xe0), "LightYellow"),
    (Rgb::new(0x32, 0xcd, 0x32), "LimeGreen"),
    (Rgb::new(0xfa, 0xf0, 0xe6), "Linen"),
    (Rgb::new(0x66, 0xcd, 0xaa), "MediumAquaMarine"),
    (Rgb::new(0x00, 0x00, 0xcd), "MediumBlue"),
    (Rgb::new(0xba, 0x55, 0xd3), "MediumOrchid"),
    (Rgb::new(0x93, 0x70, 0xdb), "MediumPurple"),
    (Rgb::new(0x3c, 0xb3, 0x71), "MediumSeaGreen"),
    (Rgb::new(0x7b, 0x68, 0xee), "MediumSlateBlue"),
    (Rgb::new(0x48, 0xd1, 0xcc), "MediumTurquoise"),
    (Rgb::new(0xc7, 0x15, 0x85), "MediumVioletRed"),
    (Rgb::new(0x19, 0x19, 0x70), "MidnightBlue"),
    (Rgb::new(0xf5, 0xff, 0xfa), "MintCream"),
    (Rgb::new(0xff, 0xe4, 0xe1), "MistyRose"),
    (Rgb::new(0xff, 0xe4, 0xb5), "Moccasin"),
    (Rgb::new(0xff, 0xde, 0xad), "NavajoWhite"),
    (Rgb::new(0xfd, 0xf5, 0xe6), "OldLace"),
    (Rgb::new(0x6b, 0x8e, 0x23), "OliveDrab"),
    (Rgb::new(0xda, 0x70, 0xd6), "Orchid"),
    (Rgb::new(0xee, 0xe8, 0xaa), "PaleGoldenRod"),
    (Rgb::new(0x98, 0xfb, 0x98), "PaleGreen"),
    (Rgb::new(0xaf, 0xee, 0xee), "PaleTurquoise"),
    (Rgb::new(0xdb, 0x70, 0x93), "PaleVioletRed"),
    (Rgb::new(0xff, 0xef, 0xd5), "PapayaWhip"),
    (Rgb::new(0xff, 0xda, 0xb9), "PeachPuff"),
    (Rgb::new(0xcd, 0x85, 0x3f), "Peru"),
    (Rgb::new(0xff, 0xc0, 0xcb), "Pink"),
    (Rgb::new(0xdd, 0xa0, 0xdd), "Plum"),
    (Rgb::new(0xb0, 0xe0, 0xe6), "PowderBlue"),
    (Rgb::new(0xbc, 0x8f, 0x8f), "RosyBrown"),
    (Rgb::new(0x41, 0x69, 0xe1), "RoyalBlue"),
    (Rgb::new(0xfa, 0x80, 0x72), "Salmon"),
    (Rgb::new(0xf4, 0xa4, 0x60), "SandyBrown"),
    (Rgb::new(0x2e, 0x8b, 0x57), "SeaGreen"),
    (Rgb::new(0xff, 0xf5, 0xee), "SeaShell"),
    (Rgb::new(0xa0, 0x52, 0x2d), "Sienna"),
    (Rgb::new(0x87, 0xce, 0xeb), "SkyBlue"),
    (Rgb::new(0x6a, 0x5a, 0xcd), "SlateBlue"),
    (Rgb::new(0x70, 0x80, 0x90), "SlateGray"),
    (Rgb::new(0xff, 0xfa, 0xfa), "Snow"),
    (Rgb::new(0x00, 0xff, 0x7f), "SpringGreen"),
    (Rgb::new(0x46, 0x82, 0xb4), "SteelBlue"),
    (Rgb::new(0xd2, 0xb4, 0x8c), "Tan"),
    (Rgb::new(0xd8, 0xbf, 0xd8), "Thistle"),
    (Rgb::new(0x40, 0xe0, 0xd0), "Turquoise"),
    (Rgb::new(0xee, 0x82, 0xee), "Violet"),
    (Rgb::new(0xf5, 0xde, 0xb3), "Wheat"),
    (Rgb::new(0xf5, 0xf5, 0xf5), "WhiteSmoke"),
    (Rgb::new(0x9a, 0xcd, 0x32), "YellowGreen"),
];

/// Name of the nearest table color.
pub fn closest_color_name(rgb: Rgb) -> &'static str {
    let mut best = "Custom";
    let mut best_dist = u32::MAX;
    for &(candidate, name) in COLOR_NAMES {
        let dist = distance_sq(rgb, candidate);
        if dist < best_dist {
            best_dist = dist;
            best = name;
        }
    }
    best
}

fn distance_sq(a: Rgb, b: Rgb) -> u32 {
    let d = |x: u8, y: u8| (i32::from(x) - i32::from(y)).unsigned_abs().pow(2);
    d(a.r, b.r) + d(a.g, b.g) + d(a.b, b.b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_hex_appears_once() {
        let unique: HashSet<Rgb> = COLOR_NAMES.iter().map(|(rgb, _)| *rgb).collect();
        assert_eq!(unique.len(), COLOR_NAMES.len());
        assert_eq!(COLOR_NAMES.len(), 134);
    }

    #[test]
    fn exact_matches() {
        assert_eq!(closest_color_name(Rgb::new(0, 0, 0)), "Black");
        assert_eq!(closest_color_name(Rgb::new(0xdc, 0x14, 0x3c)), "Crimson");
        assert_eq!(closest_color_name(Rgb::new(0x7f, 0xff, 0x00)), "Chartreuse");
    }

    #[test]
    fn nearest_match() {
        assert_eq!(closest_color_name(Rgb::new(250, 2, 3)), "Red");
        assert_eq!(closest_color_name(Rgb::new(0x30, 0x68, 0x98)), "SteelBlue");
        assert_eq!(closest_color_name(Rgb::new(200, 30, 30)), "FireBrick");
    }
}
