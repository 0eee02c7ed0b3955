use crate::models::Requirement::{Library, Optional, Required};
use crate::models::Side::{Both, Client, Server};
use crate::models::{Requirement, Side};

/// Curated add-on table: lowercase name, description, side, requirement.
///
/// Order matters: fuzzy matching walks this table top to bottom and takes the first hit.
pub(crate) const BUILTIN_ADDONS: &[(&str, &str, Side, Requirement)] = &[
    // Client
    ("bad packets", "Packet handling library for Fabric/Quilt mods", Both, Library),
    ("balm", "Abstraction layer / library used by BlayMappings mods (Waystones, etc.)", Both, Library),
    ("betterf3", "Replaces the F3 debug screen with a customisable, more readable one", Client, Optional),
    ("bobby", "Caches and renders chunks beyond server view-distance on the client", Client, Optional),
    ("carry on", "Lets you pick up and carry tile-entities and mobs", Both, Optional),
    ("chat heads", "Adds player head icons next to chat messages", Client, Optional),
    ("chunk loaders", "Adds blocks that keep chunks loaded when you are away", Both, Optional),
    ("cloth config api", "Configuration screen library used by many mods", Both, Library),
    ("enchantment descriptions", "Adds enchantment descriptions to tooltips", Client, Optional),
    ("fabric api", "Essential hooks and interoperability layer for Fabric mods", Both, Required),
    ("fabric language kotlin", "Enables mods written in Kotlin on Fabric", Both, Library),
    ("fallingtree", "Chop a whole tree by breaking a single log block", Both, Optional),
    ("iris shaders", "Shader pack loader compatible with OptiFine shaders, works with Sodium", Client, Optional),
    ("just enough items (jei)", "Item and recipe browser / lookup GUI", Both, Optional),
    ("lootr", "Makes loot containers per-player so everyone gets their own loot", Both, Required),
    ("mod menu", "Adds an in-game mod list screen with config access", Client, Optional),
    ("origins: legacy", "Choose an Origin at the start that gives unique abilities & weaknesses", Both, Required),
    ("text placeholder api", "Server-side text placeholder / formatting API", Both, Library),
    ("prickle", "Library providing shared utilities for BlayMappings mods", Both, Library),
    ("promenade", "Adds new biomes, mobs, and building blocks to world generation", Both, Required),
    ("sodium", "High-performance rendering engine replacement with large FPS improvements", Client, Required),
    ("supermartijn642's config lib", "Configuration library for SuperMartijn642's mods", Both, Library),
    ("supermartijn642's core lib", "Core library for SuperMartijn642's mods", Both, Library),
    ("waystones", "Adds waystones for fast-travel teleportation between locations", Both, Required),
    ("wthit", "\"What The Hell Is That\": shows an info tooltip when looking at blocks/entities", Both, Optional),
    ("xaero's minimap", "Real-time minimap overlay with waypoints", Client, Optional),
    ("xaero's world map", "Full-screen world map companion to Xaero's Minimap", Client, Optional),
    ("yetanotherconfiglib (yacl)", "Configuration screen library (YACL)", Both, Library),
    ("zoomify", "Adds a configurable zoom key (like OptiFine zoom)", Client, Optional),
    // Server
    ("additional structures", "Adds many new structures to world generation", Server, Required),
    ("chunky", "Pre-generates world chunks to reduce lag on exploration", Server, Optional),
    ("distant horizons", "Renders low-detail terrain far beyond the normal view distance (LODs)", Both, Optional),
    ("explorify", "Adds dozens of small vanilla-style structures to the world", Server, Required),
    ("incendium", "Complete overhaul of Nether world generation with structures & biomes", Server, Required),
    ("moogs end structures", "Adds new structures to the End dimension", Server, Required),
    ("moogs missing villages", "Adds village variants for biomes that lack them", Server, Required),
    ("moogs nether structures", "Adds new structures to the Nether dimension", Server, Required),
    ("moogs soaring structures", "Adds floating/sky structures to the Overworld", Server, Required),
    ("moogs temples reimagined", "Revamps vanilla temple structures", Server, Required),
    ("moogs voyager structures", "Adds exploration-focused structures across dimensions", Server, Required),
    ("no expensive", "Removes the 'Too Expensive' anvil cap", Server, Optional),
    ("structory", "Adds small vanilla-style structures and ruins to the world", Server, Required),
    ("structory towers", "Adds tower structures as an expansion to Structory", Server, Required),
    ("choicetheorem's overhauled village", "Overhauls villages with new designs for every biome", Server, Required),
    ("abridged", "Shortens & cleans up server join/leave messages", Server, Optional),
    ("alternate current", "Efficient redstone dust implementation for better server performance", Server, Required),
    ("antixray", "Hides ores from X-ray texture packs / cheats", Server, Required),
    ("beacon range extender", "Increases the effective range of beacon effects", Server, Optional),
    ("c2me", "Concurrent Chunk Management Engine: multi-threaded chunk loading", Server, Required),
    ("chest protection", "Protects chests from being opened/broken by non-owners", Server, Optional),
    ("cobweb", "Library for mod configuration and utilities", Server, Library),
    ("collective", "Shared library for Serilum's mods", Server, Library),
    ("config backuper", "Automatically backs up server config files", Server, Optional),
    ("cristellib", "Library for Cristel's mods (CTOV, etc.)", Server, Library),
    ("dungeons and taverns", "Adds dungeon and tavern structures to world generation", Server, Required),
    ("easyauth", "Server-side authentication system (login/register)", Server, Required),
    ("fastback", "Server-side world backup manager using git-based snapshots", Server, Optional),
    ("ferritecore", "Reduces RAM usage through memory optimisations", Both, Required),
    ("forge config api port", "Ports Forge's configuration API to Fabric", Server, Library),
    ("harvest with ease", "Right-click crops to harvest and auto-replant", Server, Optional),
    ("krypton", "Optimises Minecraft networking stack for better performance", Server, Required),
    ("lithium", "General-purpose server optimisation mod (game logic, AI, etc.)", Server, Required),
    ("lithostitched", "Library for data-driven worldgen stitching", Server, Library),
    ("moogs structure lib", "Library used by all Moogs structure mods", Server, Library),
    ("packetfixer", "Fixes packet size issues to prevent disconnects", Server, Required),
    ("polymer", "Server-side mod framework that lets server mods work without client mods", Server, Library),
    ("skin restorer", "Restores player skins on offline/hybrid servers", Server, Optional),
    ("spark", "Performance profiler and monitoring tool", Server, Optional),
    ("sparse structures", "Adjusts vanilla structure spacing to reduce clustering", Server, Optional),
    ("tectonic", "Overhauls terrain generation with dramatic landscapes", Server, Required),
    ("towns and towers", "Adds pillager outpost and village structure variants", Server, Required),
    ("villager names", "Gives villagers random human names", Server, Optional),
    ("worldedit", "In-game map editor for large-scale building and terraforming", Server, Optional),
    ("brewery", "Adds an alcohol brewing system with cauldrons, barrels, and aging", Server, Optional),
];

/// Add-ons the registry search can't find by name: lowercase name -> slug or project id.
pub(crate) const BUILTIN_REGISTRY_ALIASES: &[(&str, &str)] = &[
    ("choicetheorem's overhauled village", "ct-overhaul-village"),
    ("towns and towers", "towns-and-towers"),
    ("no expensive", "no-expensive"),
    ("beacon range extender", "beacon-range-extender"),
    ("forge config api port", "forge-config-api-port"),
    ("moogs end structures", "mes-moogs-end-structures"),
    ("moogs missing villages", "mmv-moogs-missing-villages"),
    ("moogs nether structures", "mns-moogs-nether-structures"),
    ("moogs soaring structures", "mss-moogs-soaring-structures"),
    ("moogs temples reimagined", "mtr-moogs-temples-reimagined"),
    ("moogs voyager structures", "moogs-voyager-structures"),
    ("moogs structure lib", "moogs-structure-lib"),
    ("worldedit", "worldedit"),
    ("worldedit mod", "worldedit"),
    ("additional structures", "additional-structures"),
    ("c2me", "c2me-fabric"),
];

/// Archive filenames whose names defeat the heuristics: filename -> (name, version).
pub(crate) const BUILTIN_FILENAME_OVERRIDES: &[(&str, &str, &str)] = &[
    ("[Fabric]ctov-1.21.11-3.6.1a.jar", "ChoiceTheorem's Overhauled Village", "3.6.1a"),
    ("t_and_t-fabric-neoforge-1.13.8.jar", "Towns and Towers", "1.13.8"),
    ("NE-1.21.11-1.10.2.jar", "No Expensive", "1.10.2"),
    ("Origins-Legacy-1.11.4+1.21.11.jar", "Origins: Legacy", "1.11.4+1.21.11"),
    ("beaconrange-1.4.0-21.jar", "Beacon Range Extender", "1.4.0"),
    ("Explorify v1.6.4 f15-88.mod.jar", "Explorify", "1.6.4"),
    ("Incendium_1.21.x_v5.4.10.jar", "Incendium", "5.4.10"),
    ("Structory_1.21.x_v1.3.14.jar", "Structory", "1.3.14"),
    ("Structory_Towers_1.21.x_v1.0.15.jar", "Structory Towers", "1.0.15"),
    ("supermartijn642configlib-1.1.8-fabric-mc1.21.11.jar", "SuperMartijn642's Config Lib", "1.1.8"),
    ("supermartijn642corelib-1.1.20-fabric-mc1.21.11.jar", "SuperMartijn642's Core Lib", "1.1.20"),
    ("MoogsEndStructures-1.21-2.0.1.jar", "Moogs End Structures", "2.0.1"),
    ("MoogsMissingVillages-1.21-2.0.0.jar", "Moogs Missing Villages", "2.0.0"),
    ("MoogsNetherStructures-1.21-2.0.31.jar", "Moogs Nether Structures", "2.0.31"),
    ("MoogsSoaringStructures-1.21-2.0.2.jar", "Moogs Soaring Structures", "2.0.2"),
    ("MoogsTemplesReimagined-1.21-1.1.0.jar", "Moogs Temples Reimagined", "1.1.0"),
    ("MoogsVoyagerStructures-1.21-5.0.5.jar", "Moogs Voyager Structures", "5.0.5"),
    ("ForgeConfigAPIPort-v21.11.1-mc1.21.11-Fabric.jar", "Forge Config API Port", "21.11.1"),
    ("worldedit-mod-7.4.0.jar", "WorldEdit", "7.4.0"),
    ("AdditionalStructures-1.21-(v.5.2.0-FABRIC)-dev.jar", "Additional Structures", "5.2.0"),
];
