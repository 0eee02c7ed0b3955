/// Relative config path -> owning add-on.
pub(crate) const BUILTIN_CONFIG_OWNERS: &[(&str, &str)] = &[
    // Client
    ("bobby.conf", "Bobby"),
    ("carryon-client.json", "Carry On"),
    ("carryon-common.json", "Carry On"),
    ("chat_heads.json5", "Chat Heads"),
    ("chunkloaders-common.toml", "Chunk Loaders"),
    ("enchdesc.json", "Enchantment Descriptions"),
    ("fallingtree.json", "FallingTree"),
    ("iris-excluded.json", "Iris Shaders"),
    ("iris.properties", "Iris Shaders"),
    ("lootr.json", "Lootr"),
    ("modmenu.json", "Mod Menu"),
    ("origins_server.json", "Origins: Legacy"),
    ("pal.properties", "Origins: Legacy"),
    ("power_config.json5", "Origins: Legacy"),
    ("promenade.json", "Promenade"),
    ("sodium-fingerprint.json", "Sodium"),
    ("sodium-mixins.properties", "Sodium"),
    ("sodium-options.json", "Sodium"),
    ("waystones-common.toml", "Waystones"),
    ("xaerohud.txt", "Xaero's Minimap"),
    ("xaeropatreon.txt", "Xaero's Minimap"),
    ("yacl.json5", "YetAnotherConfigLib (YACL)"),
    ("zoomify.json", "Zoomify"),
    ("cardinal-components-api.properties", "Origins: Legacy"),
    ("biolith/general.json", "Promenade"),
    ("enhancedgroups/enhancedgroups.properties", "Enhanced Groups"),
    ("fabric/indigo-renderer.properties", "Fabric API"),
    ("jei/recipe-category-sort-order.ini", "Just Enough Items (JEI)"),
    ("jei/ingredient-list-type-sort-order.ini", "Just Enough Items (JEI)"),
    ("jei/blacklist.json", "Just Enough Items (JEI)"),
    ("jei/jei-colors.ini", "Just Enough Items (JEI)"),
    ("jei/ingredient-list-mod-sort-order.ini", "Just Enough Items (JEI)"),
    ("jei/jei-mod-id-format.ini", "Just Enough Items (JEI)"),
    ("jei/jei-client.ini", "Just Enough Items (JEI)"),
    ("jei/jei-debug.ini", "Just Enough Items (JEI)"),
    ("waila/waila.json5", "WTHIT"),
    ("waila/debug.json5", "WTHIT"),
    ("waila/blacklist.json5", "WTHIT"),
    ("waila/waila_plugins.json5", "WTHIT"),
    ("waila/plugin_toggle.json5", "WTHIT"),
    ("voicechat/username-cache.json", "Simple Voice Chat"),
    ("voicechat/voicechat-client.properties", "Simple Voice Chat"),
    ("voicechat/player-volumes.properties", "Simple Voice Chat"),
    ("voicechat/voicechat-server.properties", "Simple Voice Chat"),
    ("voicechat/category-volumes.properties", "Simple Voice Chat"),
    ("voicechat/translations.properties", "Simple Voice Chat"),
    ("xaero/minimap.txt", "Xaero's Minimap"),
    // Server
    ("abridged.json", "Abridged"),
    ("antixray.toml", "AntiXray"),
    ("beacon-range-extender.json", "Beacon Range Extender"),
    ("c2me.toml", "C2ME"),
    ("collective.json5", "Collective"),
    ("collective/entity_names.json", "Collective"),
    ("ctov.json", "ChoiceTheorem's Overhauled Village"),
    ("DistantHorizons.toml", "Distant Horizons"),
    ("ferritecore.mixin.properties", "FerriteCore"),
    ("forgeconfigapiport.toml", "Forge Config API Port"),
    ("harvest_with_ease-common.toml", "Harvest With Ease"),
    ("lithium.properties", "Lithium"),
    ("lithostitched.json", "Lithostitched"),
    ("NoExpensive.json", "No Expensive"),
    ("packetfixer.properties", "PacketFixer"),
    ("sparsestructures.json5", "Sparse Structures"),
    ("tectonic.json", "Tectonic"),
    ("villagernames.json5", "Villager Names"),
    ("villagernames/customnames.txt", "Villager Names"),
    ("chunky/config.json", "Chunky"),
    ("skinrestorer/mojang_profile_cache.json", "Skin Restorer"),
    ("skinrestorer/config.json", "Skin Restorer"),
    ("spark/config.json", "Spark"),
    ("EasyAuth/technical.conf", "EasyAuth"),
    ("EasyAuth/main.conf", "EasyAuth"),
    ("EasyAuth/storage.conf", "EasyAuth"),
    ("EasyAuth/extended.conf", "EasyAuth"),
    ("EasyAuth/translation.conf", "EasyAuth"),
    ("towns_and_towers/structure_enable_or_disable_new.json5", "Towns and Towers"),
    ("towns_and_towers/structure_rarity_new.json5", "Towns and Towers"),
    ("vanilla_structures/placement_structure_config.json5", "Sparse Structures"),
    ("vanilla_structures/toggle_structure_config.json5", "Sparse Structures"),
    ("cristellib/built_in_packs.json5", "CristelLib"),
    ("cristellib/auto_config_settings.json5", "CristelLib"),
    ("polymer/common.json", "Polymer"),
    ("polymer/server.json", "Polymer"),
    ("polymer/sound-patch.json", "Polymer"),
    ("polymer/auto-host.json", "Polymer"),
    ("worldedit/worldedit.properties", "WorldEdit"),
];

/// Top-level config directories owned by one add-on, matched case-insensitively.
pub(crate) const BUILTIN_OWNER_DIRECTORIES: &[(&str, &str)] = &[
    ("jei", "Just Enough Items (JEI)"),
    ("waila", "WTHIT"),
    ("voicechat", "Simple Voice Chat"),
    ("xaero", "Xaero's Minimap"),
];
