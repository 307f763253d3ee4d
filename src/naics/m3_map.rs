//! M3 category code to NAICS crosswalk.
//!
//! Transcribed from the Census "Composition of Industry Categories"
//! appendix. Used when no `m3_naics_map.json` override is present.

/// `(m3_code, naics, name, aggregate)`
pub(crate) static M3_CROSSWALK: &[(&str, &str, &str, bool)] = &[
    ("11A", "3112", "Grain and Oilseed Milling", false),
    ("11B", "3115", "Dairy Product Manufacturing", false),
    ("11C", "3116,3117", "Animal Slaughtering/Processing, Seafood", false),
    ("11D", "311 (other)", "Other Food Manufacturing", false),
    ("11S", "311", "Food Products", false),
    ("12A", "3121", "Beverage Manufacturing", false),
    ("12B", "3122", "Tobacco Manufacturing", false),
    ("12S", "312", "Beverage and Tobacco Products", false),
    ("13A", "313", "Textile Mills", false),
    ("13S", "313", "Textile Mills", false),
    ("14A", "314", "Textile Product Mills", false),
    ("14S", "314", "Textile Product Mills", false),
    ("15A", "315", "Apparel Manufacturing", false),
    ("15S", "315", "Apparel", false),
    ("16A", "316", "Leather and Allied Products", false),
    ("16S", "316", "Leather and Allied Products", false),
    ("21A", "321991,321992", "Wood Building and Mobile Home Mfg", false),
    ("21B", "321 (other)", "Other Wood Product Manufacturing", false),
    ("21S", "321", "Wood Products", false),
    ("22A", "3221", "Pulp, Paper, and Paperboard Mills", false),
    ("22B", "32221", "Paperboard Container Manufacturing", false),
    ("22C", "3222 (other)", "Other Paper Manufacturing", false),
    ("22S", "322", "Paper Products", false),
    ("23A", "323", "Printing and Related Support Activities", false),
    ("23S", "323", "Printing", false),
    ("24A", "324110", "Petroleum Refineries", false),
    ("24B", "324121,324122", "Asphalt Paving and Roofing Materials", false),
    ("24C", "324191,324199", "Other Petroleum and Coal Products", false),
    ("24S", "324", "Petroleum and Coal Products", false),
    ("25A", "3253", "Pesticides, Fertilizers, Ag Chemicals", false),
    ("25B", "3254", "Pharmaceutical and Medicine Mfg", false),
    ("25C", "3255", "Paint, Coating, and Adhesive Mfg", false),
    ("25D", "325 (other)", "Other Chemical Products", false),
    ("25S", "325", "Chemical Products", false),
    ("26A", "32621", "Tire Manufacturing", false),
    ("26B", "326 (other)", "Other Plastics and Rubber Products", false),
    ("26S", "326", "Plastics and Rubber Products", false),
    ("27A", "327", "Nonmetallic Mineral Products", false),
    ("27S", "327", "Nonmetallic Mineral Products", false),
    ("31A", "3311,3312", "Iron and Steel Mills and Steel Products", false),
    ("31B", "3313,3314", "Alumina, Aluminum, and Nonferrous Metals", false),
    ("31C", "33151", "Ferrous Metal Foundries", false),
    ("31D", "33152", "Nonferrous Metal Foundries", false),
    ("31S", "331", "Primary Metals", false),
    ("32A", "3321", "Forging and Stamping", false),
    ("32B", "33221", "Cutlery and Handtool Mfg", false),
    ("32C", "3324", "Boiler, Tank, and Shipping Container Mfg", false),
    ("32D", "33291", "Metal Valve Manufacturing", false),
    ("32E", "33299", "Small Arms and Ordnance, Nondefense", false),
    ("32F", "33299", "Small Arms and Ordnance, Defense", false),
    ("32G", "332 (other)", "Other Fabricated Metal Products", false),
    ("32S", "332", "Fabricated Metal Products", false),
    ("33A", "333111", "Farm Machinery and Equipment", false),
    ("33B", "333112", "Lawn/Garden Tractor and Equipment", false),
    ("33C", "333120", "Construction Machinery", false),
    ("33D", "33313", "Mining, Oil and Gas Field Machinery", false),
    ("33E", "33324", "Industrial Machinery", false),
    ("33F", "333318", "Commercial and Service Industry Machinery", false),
    ("33G", "333314,333316", "Photographic Equipment", false),
    ("33H", "33341", "HVAC and Commercial Refrigeration Equipment", false),
    ("33I", "33351", "Metalworking Machinery", false),
    ("33J", "333611", "Turbine and Turbine Generator Set Units", false),
    ("33K", "333612,333613,333618", "Other Power Transmission Equipment", false),
    ("33L", "33391", "Pump and Compressor Mfg", false),
    ("33M", "33392", "Material Handling Equipment", false),
    ("33N", "33399", "All Other Machinery", false),
    ("33S", "333", "Machinery", false),
    ("34A", "334111", "Electronic Computer Mfg", false),
    ("34B", "334112", "Computer Storage Device Mfg", false),
    ("34C", "334118", "Other Computer Peripheral Equipment", false),
    ("34D", "33421,33422,33429", "Communications Equipment, Nondefense", false),
    ("34E", "33421,33422,33429", "Communications Equipment, Defense", false),
    ("34F", "334310", "Audio and Video Equipment", false),
    ("34G", "334413", "Semiconductor Mfg", false),
    ("34H", "33441 (other)", "Other Electronic Components", false),
    ("34I", "334511", "Search/Navigation Equipment, Nondefense", false),
    ("34J", "334511", "Search/Navigation Equipment, Defense", false),
    ("34K", "33451 (other)", "Measuring, Electromedical, Control Instruments", false),
    ("34L", "33461", "Magnetic and Optical Media Mfg", false),
    ("34S", "334", "Computers and Electronic Products", false),
    ("34X", "334", "Computers and Electronic Products Subtotal", false),
    ("35A", "3351", "Electric Lighting Equipment", false),
    ("35B", "3352", "Household Appliances", false),
    ("35C", "3353", "Electrical Equipment", false),
    ("35D", "33591", "Batteries", false),
    ("35E", "3359 (other)", "Other Electrical Equipment and Components", false),
    ("35S", "335", "Electrical Equipment and Components", false),
    ("36A", "336111", "Automobile Manufacturing", false),
    ("36B", "336112", "Light Truck and Utility Vehicle Mfg", false),
    ("36C", "336120", "Heavy Duty Truck Manufacturing", false),
    ("36D", "33621", "Motor Vehicle Body and Trailer Mfg", false),
    ("36E", "3363", "Motor Vehicle Parts Mfg", false),
    ("36F", "336411", "Aircraft Manufacturing, Nondefense", false),
    ("36G", "336411", "Aircraft Manufacturing, Defense", false),
    ("36H", "336412,336413", "Aircraft Engine and Parts, Nondefense", false),
    ("36I", "336412,336413", "Aircraft Engine and Parts, Defense", false),
    ("36K", "336510", "Railroad Rolling Stock", false),
    ("36L", "336611,336612", "Ship and Boat Building, Nondefense", false),
    ("36M", "336611,336612", "Ship and Boat Building, Defense", false),
    ("36P", "336414,336415,336419", "Guided Missile/Space Vehicle, Nondefense", false),
    ("36Q", "336414,336415,336419", "Guided Missile/Space Vehicle, Defense", false),
    ("36R", "336992", "Military Armored Vehicle/Tank, Nondefense", false),
    ("36T", "336992", "Military Armored Vehicle/Tank, Defense", false),
    ("36U", "336991,336999", "Other Transportation Equipment", false),
    ("36S", "336", "Transportation Equipment", false),
    ("36Z", "33621,3363", "Motor Vehicle Bodies, Parts, and Trailers", false),
    ("37A", "3371", "Household Furniture and Kitchen Cabinet", false),
    ("37B", "33712,33721", "Office and Institutional Furniture", false),
    ("37C", "3379", "Other Furniture Related Products", false),
    ("37S", "337", "Furniture and Related Products", false),
    ("39A", "33911", "Medical Equipment and Supplies", false),
    ("39B", "33992,33993", "Sporting/Athletic Goods, Doll/Toy/Game", false),
    ("39C", "33994", "Office Supplies (except Paper)", false),
    ("39D", "339 (other)", "Other Miscellaneous Manufacturing", false),
    ("39S", "339", "Miscellaneous Manufacturing", false),
    ("MTM", "31-33", "Total Manufacturing", true),
    ("MDM", "31-33 (durable)", "Durable Goods", true),
    ("MNM", "31-33 (nondurable)", "Nondurable Goods", true),
    ("MXT", "31-33 ex 336", "Manufacturing excl. Transportation", true),
    ("MXD", "31-33 ex defense", "Manufacturing excl. Defense", true),
    ("DXT", "durable ex 336", "Durable Goods excl. Transportation", true),
    ("DXD", "durable ex defense", "Durable Goods excl. Defense", true),
    ("TCG", "composite", "Capital Goods", true),
    ("NDE", "composite", "Nondefense Capital Goods", true),
    ("NXA", "composite", "Nondefense Capital Goods excl. Aircraft", true),
    ("DEF", "composite", "Defense Capital Goods", true),
    ("CDG", "composite", "Consumer Durable Goods", true),
    ("CNG", "composite", "Consumer Nondurable Goods", true),
    ("COG", "composite", "Consumer Goods", true),
    ("MVP", "3361,3362,3363", "Motor Vehicles and Parts", true),
    ("BTP", "33621,3363", "Motor Vehicle Bodies, Trailers, Parts", true),
    ("NAP", "336411,336412,336413", "Nondefense Aircraft and Parts", true),
    ("DAP", "336411,336412,336413", "Defense Aircraft and Parts", true),
    ("ITI", "composite", "Information Technology", true),
    ("CRP", "33411", "Computers and Related Products", true),
    ("CMS", "composite", "Construction Materials and Supplies", true),
    ("ODG", "321,327,337,339", "Other Durable Goods", true),
    ("TGP", "33361", "Turbines/Generators/Power Transmission", true),
    ("MTU", "composite", "Manufacturing with Unfilled Orders", true),
    ("ANM", "3313,3314,33152", "Aluminum and Nonferrous Metal Products", true),
];
